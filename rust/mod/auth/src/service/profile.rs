use tracing::info;

use tripmatch_core::{now_rfc3339, MbtiType};
use tripmatch_sql::{Row, Value};

use crate::model::{ProfileUpdate, UserProfile};
use crate::service::{AuthError, AuthService};

const COLUMNS: &str = "id, email, nickname, mbti_type, created_at, updated_at";

/// Trimmed nickname, rejecting blanks.
pub(crate) fn validate_nickname(nickname: &str) -> Result<String, AuthError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(AuthError::Validation("nickname must not be empty".into()));
    }
    Ok(nickname.to_string())
}

fn profile_from_row(row: &Row) -> Result<UserProfile, AuthError> {
    let mbti_type = row
        .get_str("mbti_type")
        .map(str::parse::<MbtiType>)
        .transpose()
        .map_err(|e| AuthError::Internal(e.to_string()))?;
    Ok(UserProfile {
        id: row.require_str("id")?.to_string(),
        email: row.require_str("email")?.to_string(),
        nickname: row.require_str("nickname")?.to_string(),
        mbti_type,
        created_at: row.require_str("created_at")?.to_string(),
        updated_at: row.require_str("updated_at")?.to_string(),
    })
}

impl AuthService {
    pub fn get_profile(&self, id: &str) -> Result<Option<UserProfile>, AuthError> {
        let sql = format!("SELECT {COLUMNS} FROM profiles WHERE id = ?1");
        let rows = self.sql.query(&sql, &[Value::from(id)])?;
        rows.first().map(profile_from_row).transpose()
    }

    pub fn create_profile(&self, profile: &UserProfile) -> Result<(), AuthError> {
        let nickname = validate_nickname(&profile.nickname)?;
        let sql = format!("INSERT INTO profiles ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)");
        self.sql
            .exec(
                &sql,
                &[
                    Value::from(profile.id.as_str()),
                    Value::from(profile.email.as_str()),
                    Value::from(nickname),
                    Value::from(profile.mbti_type.map(String::from)),
                    Value::from(profile.created_at.as_str()),
                    Value::from(profile.updated_at.as_str()),
                ],
            )
            .map_err(|e| match AuthError::from(e) {
                AuthError::Conflict(_) => {
                    AuthError::Conflict(format!("profile {} already exists", profile.id))
                }
                other => other,
            })?;
        info!(user_id = %profile.id, "profile created");
        Ok(())
    }

    /// Apply `update` and return the stored result.
    pub fn update_profile(
        &self,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let mut profile = self
            .get_profile(id)?
            .ok_or_else(|| AuthError::NotFound(format!("profile {id}")))?;

        if let Some(nickname) = update.nickname {
            profile.nickname = validate_nickname(&nickname)?;
        }
        if let Some(mbti_type) = update.mbti_type {
            profile.mbti_type = Some(mbti_type);
        }
        profile.updated_at = now_rfc3339();

        self.sql.exec(
            "UPDATE profiles SET nickname = ?1, mbti_type = ?2, updated_at = ?3 WHERE id = ?4",
            &[
                Value::from(profile.nickname.as_str()),
                Value::from(profile.mbti_type.map(String::from)),
                Value::from(profile.updated_at.as_str()),
                Value::from(id),
            ],
        )?;
        info!(user_id = %id, "profile updated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;

    #[test]
    fn create_then_get() {
        let (svc, _dir) = testing::service();
        assert_eq!(svc.get_profile("u1").unwrap(), None);

        let profile = UserProfile::new("u1", "ada@example.com", "  Ada ");
        svc.create_profile(&profile).unwrap();

        let stored = svc.get_profile("u1").unwrap().unwrap();
        assert_eq!(stored.nickname, "Ada");
        assert_eq!(stored.mbti_type, None);
        assert_eq!(stored.email, "ada@example.com");
    }

    #[test]
    fn create_rejects_blank_nickname_and_duplicates() {
        let (svc, _dir) = testing::service();
        assert!(matches!(
            svc.create_profile(&UserProfile::new("u1", "a@b.c", "   ")),
            Err(AuthError::Validation(_))
        ));

        svc.create_profile(&UserProfile::new("u1", "a@b.c", "Ada")).unwrap();
        assert!(matches!(
            svc.create_profile(&UserProfile::new("u1", "a@b.c", "Ada")),
            Err(AuthError::Conflict(_))
        ));
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let (svc, _dir) = testing::service();
        svc.create_profile(&UserProfile::new("u1", "a@b.c", "Ada")).unwrap();

        let updated = svc
            .update_profile("u1", ProfileUpdate::mbti_type(MbtiType::Enfp))
            .unwrap();
        assert_eq!(updated.nickname, "Ada");
        assert_eq!(updated.mbti_type, Some(MbtiType::Enfp));

        let updated = svc
            .update_profile(
                "u1",
                ProfileUpdate {
                    nickname: Some("Countess".into()),
                    mbti_type: None,
                },
            )
            .unwrap();
        assert_eq!(updated.nickname, "Countess");
        assert_eq!(updated.mbti_type, Some(MbtiType::Enfp));
        assert_eq!(svc.get_profile("u1").unwrap(), Some(updated));
    }

    #[test]
    fn update_errors() {
        let (svc, _dir) = testing::service();
        assert!(matches!(
            svc.update_profile("ghost", ProfileUpdate::default()),
            Err(AuthError::NotFound(_))
        ));

        svc.create_profile(&UserProfile::new("u1", "a@b.c", "Ada")).unwrap();
        let blank = ProfileUpdate {
            nickname: Some(" ".into()),
            mbti_type: None,
        };
        assert!(matches!(
            svc.update_profile("u1", blank),
            Err(AuthError::Validation(_))
        ));
    }
}
