use dps_domain::RecordType;

pub const HEADER_LEN: usize = 12;
const MAX_DOMAIN_LEN: usize = 253;

const FLAG_QR: u16 = 0x8000;
const FLAG_TC: u16 = 0x0200;
const FLAG_RD: u16 = 0x0100;
const OPCODE_MASK: u16 = 0x7800;
const RR_TYPE_OPT: u16 = 41;

/// Header and single question of a DNS message, decoded without allocating
/// a full `Message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireQuestion {
    pub id: u16,
    pub flags: u16,
    /// Lowercased, no trailing dot. Empty for the root.
    pub name: String,
    pub record_type: RecordType,
    pub qclass: u16,
    /// Byte offset in the original buffer where the question section ends.
    pub question_end: usize,
    /// True when the sender attached an EDNS0 OPT record.
    pub has_edns: bool,
}

impl WireQuestion {
    pub fn is_response(&self) -> bool {
        self.flags & FLAG_QR != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> 11) as u8
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & FLAG_RD != 0
    }

    pub fn truncated(&self) -> bool {
        self.flags & FLAG_TC != 0
    }

    /// Raw question section bytes as they appeared in `buf`.
    pub fn question_bytes<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[HEADER_LEN..self.question_end.min(buf.len())]
    }
}

pub fn read_id(buf: &[u8]) -> Option<u16> {
    if buf.len() < HEADER_LEN {
        return None;
    }
    Some(u16::from_be_bytes([buf[0], buf[1]]))
}

/// Parses the header and the first question of `buf`.
///
/// Returns `None` when:
///
/// * the buffer is shorter than a header
/// * QDCOUNT is not exactly 1
/// * the QNAME is truncated, too long, compressed or not valid UTF-8
pub fn parse_question(buf: &[u8]) -> Option<WireQuestion> {
    if buf.len() < HEADER_LEN + 5 {
        return None;
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let flags = u16::from_be_bytes([buf[2], buf[3]]);
    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    let ancount = u16::from_be_bytes([buf[6], buf[7]]);
    let nscount = u16::from_be_bytes([buf[8], buf[9]]);
    let arcount = u16::from_be_bytes([buf[10], buf[11]]);

    if qdcount != 1 {
        return None;
    }

    let mut pos = HEADER_LEN;
    let mut name: Vec<u8> = Vec::with_capacity(64);

    loop {
        let label_len = *buf.get(pos)? as usize;
        if label_len == 0 {
            pos += 1;
            break;
        }
        if label_len & 0xC0 != 0 {
            return None;
        }
        pos += 1;
        if pos + label_len > buf.len() {
            return None;
        }
        if !name.is_empty() {
            name.push(b'.');
        }
        if name.len() + label_len > MAX_DOMAIN_LEN {
            return None;
        }
        name.extend(buf[pos..pos + label_len].iter().map(u8::to_ascii_lowercase));
        pos += label_len;
    }

    if pos + 4 > buf.len() {
        return None;
    }
    let qtype = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
    let qclass = u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]);
    pos += 4;

    let name = String::from_utf8(name).ok()?;
    let has_edns = ancount == 0 && nscount == 0 && has_opt_record(buf, pos, arcount);

    Some(WireQuestion {
        id,
        flags,
        name,
        record_type: RecordType::from_u16(qtype),
        qclass,
        question_end: pos,
        has_edns,
    })
}

fn has_opt_record(buf: &[u8], mut pos: usize, arcount: u16) -> bool {
    for _ in 0..arcount {
        pos = match skip_name(buf, pos) {
            Some(p) => p,
            None => return false,
        };
        if pos + 10 > buf.len() {
            return false;
        }
        let rr_type = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
        if rr_type == RR_TYPE_OPT {
            return true;
        }
        let rdlen = u16::from_be_bytes([buf[pos + 8], buf[pos + 9]]) as usize;
        pos += 10 + rdlen;
    }
    false
}

fn skip_name(buf: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *buf.get(pos)? as usize;
        if len == 0 {
            return Some(pos + 1);
        }
        if len & 0xC0 == 0xC0 {
            return Some(pos + 2);
        }
        pos += 1 + len;
    }
}

/// Lowers every record TTL above `max_ttl` to `max_ttl`, leaving OPT
/// pseudo-records alone. Returns `None` when the message cannot be walked;
/// records before the bad one keep their rewritten TTLs.
pub fn cap_record_ttls(buf: &mut [u8], max_ttl: u32) -> Option<()> {
    if buf.len() < HEADER_LEN {
        return None;
    }
    let count = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]) as usize;
    let qdcount = count(4);
    let rrcount = count(6) + count(8) + count(10);

    let mut pos = HEADER_LEN;
    for _ in 0..qdcount {
        pos = skip_name(buf, pos)? + 4;
    }

    for _ in 0..rrcount {
        pos = skip_name(buf, pos)?;
        let fixed = buf.get_mut(pos..pos + 10)?;
        let rr_type = u16::from_be_bytes([fixed[0], fixed[1]]);
        if rr_type != RR_TYPE_OPT {
            let ttl = u32::from_be_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]);
            if ttl > max_ttl {
                fixed[4..8].copy_from_slice(&max_ttl.to_be_bytes());
            }
        }
        let rdlen = u16::from_be_bytes([fixed[8], fixed[9]]) as usize;
        pos += 10 + rdlen;
    }

    (pos <= buf.len()).then_some(())
}

/// Encodes `name` as uncompressed wire labels, including the root label.
pub fn encode_name(name: &str, out: &mut Vec<u8>) -> bool {
    for label in name.split('.').filter(|l| !l.is_empty()) {
        if label.len() > 63 {
            return false;
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    true
}
