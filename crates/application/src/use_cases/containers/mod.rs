mod register;

pub use register::ContainerRecordsUseCase;
