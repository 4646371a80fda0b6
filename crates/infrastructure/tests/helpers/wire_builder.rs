use dps_infrastructure::dns::wire::{encode_name, parse_question};
use std::net::Ipv4Addr;

/// Plain recursive query as a stub resolver would send it.
pub fn client_query(id: u16, name: &str, qtype: u16, with_edns: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&id.to_be_bytes());
    buf.extend_from_slice(&[0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
    buf.push(u8::from(with_edns));
    encode_name(name, &mut buf);
    buf.extend_from_slice(&qtype.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    if with_edns {
        buf.extend_from_slice(&[0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }
    buf
}

/// Builds an upstream reply to a query, echoing its ID and question.
pub struct ResponseBuilder {
    id: u16,
    question: Vec<u8>,
    rcode: u8,
    truncated: bool,
    answers: Vec<Vec<u8>>,
    authority: Vec<Vec<u8>>,
}

impl ResponseBuilder {
    pub fn reply_to(query: &[u8]) -> Self {
        let parsed = parse_question(query).expect("query must be parseable");
        Self {
            id: parsed.id,
            question: query[12..parsed.question_end].to_vec(),
            rcode: 0,
            truncated: false,
            answers: Vec::new(),
            authority: Vec::new(),
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn answer_a(mut self, ip: Ipv4Addr, ttl: u32) -> Self {
        let mut rr = vec![0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01];
        rr.extend_from_slice(&ttl.to_be_bytes());
        rr.extend_from_slice(&[0x00, 0x04]);
        rr.extend_from_slice(&ip.octets());
        self.answers.push(rr);
        self
    }

    /// SOA in the authority section, owner name pointing at the question.
    pub fn soa(mut self, record_ttl: u32, minimum: u32) -> Self {
        let mut rdata = Vec::new();
        encode_name("ns1.example.net", &mut rdata);
        encode_name("hostmaster.example.net", &mut rdata);
        for value in [2024010101u32, 3600, 900, 604800, minimum] {
            rdata.extend_from_slice(&value.to_be_bytes());
        }

        let mut rr = vec![0xC0, 0x0C, 0x00, 0x06, 0x00, 0x01];
        rr.extend_from_slice(&record_ttl.to_be_bytes());
        rr.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        rr.extend_from_slice(&rdata);
        self.authority.push(rr);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.push(0x81 | if self.truncated { 0x02 } else { 0x00 });
        buf.push(0x80 | self.rcode);
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&(self.answers.len() as u16).to_be_bytes());
        buf.extend_from_slice(&(self.authority.len() as u16).to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&self.question);
        for rr in self.answers.iter().chain(self.authority.iter()) {
            buf.extend_from_slice(rr);
        }
        buf
    }
}
