// Configuration validation run after all sources are merged
use crate::error::Result;

pub trait ConfigValidator {
    /// Rejects values that deserialize fine but cannot work at runtime
    fn validate(&self) -> Result<()>;
}
