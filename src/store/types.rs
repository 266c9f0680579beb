use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stored user record. The `password` field holds the argon2 hash and is
/// present in the persisted document only; HTTP responses go through
/// [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    /// Denormalized ids of assessments owned by this user.
    #[serde(default)]
    pub assessments: Vec<String>,
    /// Denormalized ids of portfolio projects owned by this user.
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// User projection returned by the HTTP layer: everything except the
/// password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub current_role: Option<String>,
    pub experience_level: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<Skill>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub assessments: Vec<String>,
    pub projects: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            current_role: u.current_role,
            experience_level: u.experience_level,
            interests: u.interests,
            skills: u.skills,
            education: u.education,
            certifications: u.certifications,
            assessments: u.assessments,
            projects: u.projects,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Payload for creating a user. `password` must already be hashed by the
/// caller; the store never sees plaintext.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

impl NewUser {
    pub fn into_user(self, id: String, now: OffsetDateTime) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
            current_role: self.current_role,
            experience_level: self.experience_level,
            interests: self.interests,
            skills: self.skills,
            education: self.education,
            certifications: self.certifications,
            assessments: Vec::new(),
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial user update: only the provided fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub current_role: Option<String>,
    pub experience_level: Option<String>,
    pub interests: Option<Vec<String>>,
    pub skills: Option<Vec<Skill>>,
    pub education: Option<Vec<Education>>,
    pub certifications: Option<Vec<Certification>>,
}

impl UserUpdate {
    /// Merge the provided fields into `user`. The caller refreshes
    /// `updated_at`.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(v) = self.current_role {
            user.current_role = Some(v);
        }
        if let Some(v) = self.experience_level {
            user.experience_level = Some(v);
        }
        if let Some(v) = self.interests {
            user.interests = v;
        }
        if let Some(v) = self.skills {
            user.skills = v;
        }
        if let Some(v) = self.education {
            user.education = v;
        }
        if let Some(v) = self.certifications {
            user.certifications = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub skills: Vec<SkillScore>,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
    #[serde(default)]
    pub recommendations: Vec<SkillRecommendation>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecommendation {
    pub skill: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssessment {
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub skills: Vec<SkillScore>,
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub recommendations: Vec<SkillRecommendation>,
}

impl NewAssessment {
    pub fn into_assessment(self, id: String, now: OffsetDateTime) -> Assessment {
        Assessment {
            id,
            user_id: self.user_id,
            kind: self.kind,
            skills: self.skills,
            overall_score: self.overall_score,
            completed_at: self.completed_at.unwrap_or(now),
            recommendations: self.recommendations,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewPortfolio {
    pub fn into_portfolio(self, id: String, now: OffsetDateTime) -> Portfolio {
        Portfolio {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            technologies: self.technologies,
            images: self.images,
            github_url: self.github_url,
            live_url: self.live_url,
            start_date: self.start_date,
            end_date: self.end_date,
            highlights: self.highlights,
            category: self.category,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        NewUser {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            password: "$argon2id$fake".into(),
            role: Role::User,
            current_role: Some("Student".into()),
            experience_level: None,
            interests: vec!["backend".into()],
            skills: vec![],
            education: vec![],
            certifications: vec![],
        }
        .into_user("abc123".into(), OffsetDateTime::UNIX_EPOCH)
    }

    #[test]
    fn user_serializes_with_underscore_id_and_camel_case() {
        let v = serde_json::to_value(sample_user()).unwrap();
        assert_eq!(v["_id"], "abc123");
        assert!(v.get("currentRole").is_some());
        assert!(v.get("createdAt").is_some());
        // The stored document keeps the hash.
        assert_eq!(v["password"], "$argon2id$fake");
    }

    #[test]
    fn public_user_has_no_password_key() {
        let v = serde_json::to_value(PublicUser::from(sample_user())).unwrap();
        assert!(v.get("password").is_none());
        assert_eq!(v["email"], "ana@x.com");
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut user = sample_user();
        let update: UserUpdate =
            serde_json::from_value(serde_json::json!({ "name": "X" })).unwrap();
        update.apply(&mut user);
        assert_eq!(user.name, "X");
        assert_eq!(user.email, "ana@x.com");
        assert_eq!(user.current_role.as_deref(), Some("Student"));
    }

    #[test]
    fn assessment_type_field_round_trips() {
        let new: NewAssessment = serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "type": "technical",
            "overallScore": 82.5,
            "skills": [{ "name": "Rust", "score": 90.0, "recommendations": ["read the book"] }]
        }))
        .unwrap();
        let a = new.into_assessment("a1".into(), OffsetDateTime::UNIX_EPOCH);
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["type"], "technical");
        assert_eq!(v["userId"], "u1");
        assert_eq!(v["overallScore"], 82.5);
    }
}
