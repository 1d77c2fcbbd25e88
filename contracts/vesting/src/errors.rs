use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InvalidParameters = 3,
    InsufficientReserve = 4,
    ScheduleNotFound = 5,
    ScheduleRevoked = 6,
    ScheduleNotRevocable = 7,
    NotYetVested = 8,
    Unauthorized = 9,
    ReleaseExpired = 10,
    ArithmeticOverflow = 11,
    ReentrantCall = 12,
    IndexOutOfBounds = 13,
}
