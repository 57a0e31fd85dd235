use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of roles a HealthWatch user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    DistrictOfficer,
    Clinic,
    /// Accredited Social Health Activist, the community health worker
    Asha,
    Volunteer,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::DistrictOfficer => "District Health Officer",
            Role::Clinic => "Clinic Staff",
            Role::Asha => "ASHA Worker",
            Role::Volunteer => "Volunteer",
        }
    }

    /// Wire name, as accepted by [`std::str::FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::DistrictOfficer => "district_officer",
            Role::Clinic => "clinic",
            Role::Asha => "asha",
            Role::Volunteer => "volunteer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "district_officer" => Ok(Role::DistrictOfficer),
            "clinic" => Ok(Role::Clinic),
            "asha" => Ok(Role::Asha),
            "volunteer" => Ok(Role::Volunteer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Identity and profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
    pub phone_number: String,
    pub preferred_language: String,
    pub village_id: Option<String>,
    pub verified: bool,
}

/// Partial profile change; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    /// `Some(None)` removes the village; on the wire that is an explicit `null`
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present_or_null")]
    pub village_id: Option<Option<String>>,
}

/// Keeps a field that is present but `null` apart from one that is missing
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}

impl Session {
    /// Shallow merge of `update` into this session
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(phone_number) = update.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(preferred_language) = update.preferred_language {
            self.preferred_language = preferred_language;
        }
        if let Some(village_id) = update.village_id {
            self.village_id = village_id;
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OtpRequest<'a> {
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OtpVerifyRequest<'a> {
    pub phone_number: &'a str,
    pub otp: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> Session {
        Session {
            user_id: "1".to_string(),
            display_name: "Health Worker".to_string(),
            role: Role::Asha,
            phone_number: "+911234567890".to_string(),
            preferred_language: "en".to_string(),
            village_id: None,
            verified: true,
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&Role::DistrictOfficer).unwrap(), "\"district_officer\"");
        let role: Role = serde_json::from_str("\"asha\"").unwrap();
        assert_eq!(role, Role::Asha);
        assert!(serde_json::from_str::<Role>("\"doctor\"").is_err());
    }

    #[test]
    fn test_role_from_str_matches_serde() {
        for role in [Role::Admin, Role::DistrictOfficer, Role::Clinic, Role::Asha, Role::Volunteer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_apply_is_shallow_merge() {
        let mut session = sample_session();
        session.apply(ProfileUpdate {
            preferred_language: Some("hi".to_string()),
            village_id: Some(Some("V-017".to_string())),
            ..Default::default()
        });

        assert_eq!(session.preferred_language, "hi");
        assert_eq!(session.village_id.as_deref(), Some("V-017"));
        assert_eq!(session.display_name, "Health Worker");
        assert_eq!(session.role, Role::Asha);
        assert_eq!(session.phone_number, "+911234567890");
    }

    #[test]
    fn test_apply_can_clear_village() {
        let mut session = sample_session();
        session.village_id = Some("V-017".to_string());

        session.apply(ProfileUpdate {
            village_id: Some(None),
            ..Default::default()
        });

        assert_eq!(session.village_id, None);
    }

    #[test]
    fn test_village_null_differs_from_missing() {
        let cleared: ProfileUpdate = serde_json::from_str(r#"{"village_id": null}"#).unwrap();
        assert_eq!(cleared.village_id, Some(None));
        assert!(!cleared.is_empty());

        let untouched: ProfileUpdate = serde_json::from_str(r#"{"display_name": "Asha"}"#).unwrap();
        assert_eq!(untouched.village_id, None);

        let json = serde_json::to_value(&cleared).unwrap();
        assert!(json["village_id"].is_null());
        assert!(json.as_object().unwrap().contains_key("village_id"));
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let mut session = sample_session();
        let update = ProfileUpdate::default();
        assert!(update.is_empty());

        session.apply(update);
        assert_eq!(session, sample_session());
    }
}
