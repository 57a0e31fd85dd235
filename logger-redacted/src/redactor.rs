use regex::Regex;
use lazy_static::lazy_static;
use sha2::{Sha256, Digest};
use base64::{Engine as _, engine::general_purpose};
use std::sync::OnceLock;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    // E.164 (`+911234567890`) or a bare 10-digit mobile number
    static ref PHONE_REGEX: Regex = Regex::new(r"\+\d{8,15}\b|\b\d{10}\b").unwrap();
    static ref DEFAULT_REDACTOR: PiiRedactor = PiiRedactor::new(RedactionConfig::default());
}

static ACTIVE_REDACTOR: OnceLock<PiiRedactor> = OnceLock::new();

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }
}

/// PII redactor for log messages
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    /// Masks a value known to be a phone number, whatever its format
    pub fn redact_phone(&self, phone: &str) -> String {
        if !self.config.enabled {
            phone.to_string()
        } else if self.config.hash_for_correlation {
            format!("PHONE[{}]", self.hash_value(phone))
        } else {
            mask_middle(phone)
        }
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX.replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            if self.config.hash_for_correlation {
                format!("EMAIL[{}]", self.hash_value(email))
            } else {
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            }
        }).to_string()
    }

    fn redact_phones(&self, text: &str) -> String {
        PHONE_REGEX.replace_all(text, |caps: &regex::Captures| {
            self.redact_phone(&caps[0])
        }).to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(&result[..8]) // Use first 8 bytes for shorter hash
    }
}

/// Keeps a short prefix and the last four characters, stars the rest
fn mask_middle(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 6 {
        return "*".repeat(chars.len());
    }
    let keep_head = if chars.first() == Some(&'+') { 3 } else { 2 };
    let tail_start = chars.len() - 4;
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < keep_head || i >= tail_start { *c } else { '*' })
        .collect()
}

/// Installs the process-wide redactor. Only the first call takes effect.
pub fn install_redactor(config: RedactionConfig) -> bool {
    ACTIVE_REDACTOR.set(PiiRedactor::new(config)).is_ok()
}

fn active() -> &'static PiiRedactor {
    ACTIVE_REDACTOR.get().unwrap_or(&*DEFAULT_REDACTOR)
}

/// Redacts free text with the process-wide redactor
pub fn redact(text: &str) -> String {
    active().redact(text)
}

/// Masks a phone number with the process-wide redactor
pub fn redact_phone(phone: &str) -> String {
    active().redact_phone(phone)
}
