use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads `null` the same as a missing key. Browser storage writes `NaN`
/// point balances as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A registered identity as stored in the credential collection.
///
/// Field names follow the persisted JSON layout (`isAdmin`, `createdAt`), and
/// the secret is stored under `password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "password")]
    pub secret: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Build a fresh, non-admin identity from registration data
    pub fn from_registration(data: RegisterData, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            email: data.email,
            name: data.name,
            phone: data.phone,
            address: data.address,
            secret: data.password,
            is_admin: false,
            points: 0,
            created_at: now,
        }
    }

    pub fn matches_credentials(&self, email: &str, secret: &str) -> bool {
        self.email == email && self.secret == secret
    }

    /// The authenticated projection of this identity
    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            is_admin: self.is_admin,
            points: self.points,
            created_at: self.created_at,
        }
    }
}

/// The logged-in user. Same attributes as [`Identity`] minus the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

impl SessionUser {
    pub fn with_points(&self, points: i64) -> Self {
        Self {
            points,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

impl RegisterData {
    /// Every field of the registration form is required
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.password,
            &self.phone,
            &self.address,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }
}

/// Quick-login shortcuts for the seeded accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAccount {
    Admin,
    User,
}

impl DemoAccount {
    pub fn credentials(&self) -> LoginCredentials {
        match self {
            DemoAccount::Admin => LoginCredentials::new("admin@gmail.com", "ADMIN"),
            DemoAccount::User => LoginCredentials::new("test@gmail.com", "TEST123"),
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(DemoAccount::Admin),
            "user" | "test" => Some(DemoAccount::User),
            _ => None,
        }
    }
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Identities written into an empty credential collection
pub fn default_identities() -> Vec<Identity> {
    vec![
        Identity {
            id: "admin".to_string(),
            email: "admin@gmail.com".to_string(),
            name: "Admin User".to_string(),
            phone: "+1234567890".to_string(),
            address: "123 Admin Street, Admin City, AC 12345".to_string(),
            secret: "ADMIN".to_string(),
            is_admin: true,
            points: 0,
            created_at: seed_date(2024, 1, 1),
        },
        Identity {
            id: "test-user".to_string(),
            email: "test@gmail.com".to_string(),
            name: "Test User".to_string(),
            phone: "+1987654321".to_string(),
            address: "456 Test Avenue, Test City, TC 54321".to_string(),
            secret: "TEST123".to_string(),
            is_admin: false,
            points: 1250,
            created_at: seed_date(2024, 1, 15),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registration() -> RegisterData {
        RegisterData {
            name: "Ada".to_string(),
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
            phone: "555".to_string(),
            address: "1 Loop".to_string(),
        }
    }

    #[test]
    fn test_identity_json_layout() {
        let identity = &default_identities()[1];
        let json = serde_json::to_value(identity).unwrap();
        assert_eq!(json["password"], "TEST123");
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["points"], 1250);
        assert_eq!(json["createdAt"], "2024-01-15T00:00:00Z");
        assert!(json.get("secret").is_none());
    }

    #[test]
    fn test_identity_parses_browser_json() {
        let json = r#"{
            "id": "1717171717171",
            "email": "a@b.com",
            "name": "Ada",
            "phone": "555",
            "address": "1 Loop",
            "password": "pw",
            "createdAt": "2024-06-01T12:30:00.000Z"
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.secret, "pw");
        assert!(!identity.is_admin);
        assert_eq!(identity.points, 0);
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let json = r#"{
            "id": "1717171717171",
            "email": "a@b.com",
            "name": "Ada",
            "phone": "555",
            "address": "1 Loop",
            "password": "pw",
            "isAdmin": null,
            "points": null,
            "createdAt": "2024-06-01T12:30:00.000Z"
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.points, 0);
        assert!(!identity.is_admin);

        let session: SessionUser = serde_json::from_str(json).unwrap();
        assert_eq!(session.points, 0);
        assert!(!session.is_admin);
    }

    #[test]
    fn test_session_projection_drops_secret() {
        let session = default_identities()[0].to_session();
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["isAdmin"], true);
        assert_eq!(session.id, "admin");
    }

    #[test]
    fn test_from_registration_defaults() {
        let now = seed_date(2025, 3, 4);
        let identity = Identity::from_registration(sample_registration(), now);
        assert_eq!(identity.id, now.timestamp_millis().to_string());
        assert!(!identity.is_admin);
        assert_eq!(identity.points, 0);
        assert_eq!(identity.created_at, now);
        assert_eq!(identity.secret, "pw");
    }

    #[test]
    fn test_matches_credentials_is_exact() {
        let identity = &default_identities()[1];
        assert!(identity.matches_credentials("test@gmail.com", "TEST123"));
        assert!(!identity.matches_credentials("test@gmail.com", "test123"));
        assert!(!identity.matches_credentials("TEST@gmail.com", "TEST123"));
    }

    #[test]
    fn test_register_data_requires_every_field() {
        assert!(sample_registration().is_complete());
        let mut data = sample_registration();
        data.phone.clear();
        assert!(!data.is_complete());
    }

    #[test]
    fn test_demo_account_from_name() {
        assert_eq!(DemoAccount::from_name("Admin"), Some(DemoAccount::Admin));
        assert_eq!(DemoAccount::from_name("test"), Some(DemoAccount::User));
        assert_eq!(DemoAccount::from_name("guest"), None);
        assert_eq!(DemoAccount::User.credentials().password, "TEST123");
    }
}
