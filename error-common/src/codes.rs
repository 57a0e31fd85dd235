// Error codes implementation
// Stable codes reported to the user and written to logs

pub mod storage {
    pub const SLOT_UNAVAILABLE: &str = "STORAGE_1001";
    pub const WRITE_FAILED: &str = "STORAGE_1002";
    pub const QUOTA_EXCEEDED: &str = "STORAGE_1003";
    pub const CORRUPT_SLOT: &str = "STORAGE_1004";
}

pub mod sync {
    pub const SUBMISSION_FAILED: &str = "SYNC_2001";
    pub const NETWORK_UNREACHABLE: &str = "SYNC_2002";
    pub const TIMED_OUT: &str = "SYNC_2003";
    pub const MALFORMED_PAYLOAD: &str = "SYNC_2004";
}

pub mod authentication {
    pub const INVALID_CREDENTIALS: &str = "AUTH_3001";
    pub const INVALID_INPUT: &str = "AUTH_3002";
    pub const SESSION_MISSING: &str = "AUTH_3003";
    pub const PROVIDER_UNAVAILABLE: &str = "AUTH_3004";
}

pub mod configuration {
    pub const INVALID_CONFIG: &str = "CONFIG_4001";
}

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_5001";
}

pub mod internal {
    pub const UNEXPECTED: &str = "INTERNAL_9001";
}
