use mongodb::bson::{Bson, Document};

pub const ID_FIELD: &str = "_id";
pub const NAME_FIELD: &str = "name";
pub const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// Raw state of a user's `profileImage` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileImage {
    Absent,
    Null,
    Text(String),
    /// Any non-string value. Left alone by the cleanup.
    Other(Bson),
}

impl ProfileImage {
    pub fn from_bson(value: Option<&Bson>) -> Self {
        match value {
            None => ProfileImage::Absent,
            Some(Bson::Null) => ProfileImage::Null,
            Some(Bson::String(s)) => ProfileImage::Text(s.clone()),
            Some(other) => ProfileImage::Other(other.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: Bson,  // store-assigned _id, opaque
    pub name: Option<String>,
    pub profile_image: ProfileImage,
}

impl UserRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.get(ID_FIELD).cloned().unwrap_or(Bson::Null),
            name: document.get_str(NAME_FIELD).ok().map(str::to_string),
            profile_image: ProfileImage::from_bson(document.get(PROFILE_IMAGE_FIELD)),
        }
    }

    /// Strict empty-string check. Absent and null values do not match.
    pub fn has_empty_profile_image(&self) -> bool {
        matches!(&self.profile_image, ProfileImage::Text(s) if s.is_empty())
    }

    pub fn display_id(&self) -> String {
        match &self.id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }
}
