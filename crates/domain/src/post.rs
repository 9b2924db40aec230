//! Post — a classified listing, optionally carrying type-specific details.
//!
//! A post of type `general` has no extension. Every other type owns exactly
//! one extension record whose required fields depend on the type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CommunityError, ValidationError};
use crate::id::{CategoryId, PostId, UserId};
use crate::status::Status;
use crate::tag::Tag;
use crate::time::Timestamp;

/// Longest accepted post title.
pub const MAX_TITLE_LEN: usize = 100;

/// Discriminates which extension a post carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    General,
    Second,
    House,
    Job,
    Car,
}

impl PostType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Second => "second",
            Self::House => "house",
            Self::Job => "job",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(Self::General),
            "second" => Ok(Self::Second),
            "house" => Ok(Self::House),
            "job" => Ok(Self::Job),
            "car" => Ok(Self::Car),
            _ => Err(ValidationError::Invalid {
                field: "type",
                reason: "expected general, second, house, job or car",
            }),
        }
    }
}

/// Second-hand goods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondHand {
    pub price: f64,
    pub contact: String,
    pub condition: Option<String>,
}

/// Housing rental or sale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Housing {
    pub price: f64,
    pub area: f64,
    pub room: String,
    pub contact: String,
    pub address: Option<String>,
}

/// Job offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOffer {
    pub salary: String,
    pub company: String,
    pub contact: String,
    pub position: Option<String>,
}

/// Rideshare offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rideshare {
    pub start_place: String,
    pub end_place: String,
    pub time: String,
    pub seats: Option<i64>,
    pub contact: String,
}

/// Type-specific payload, serialized under the key of its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostExtension {
    Second(SecondHand),
    House(Housing),
    Job(JobOffer),
    Car(Rideshare),
}

impl PostExtension {
    #[must_use]
    pub fn post_type(&self) -> PostType {
        match self {
            Self::Second(_) => PostType::Second,
            Self::House(_) => PostType::House,
            Self::Job(_) => PostType::Job,
            Self::Car(_) => PostType::Car,
        }
    }

    /// Check the fields required by the extension's type.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<(), CommunityError> {
        match self {
            Self::Second(second) => {
                require_positive("price", second.price)?;
                require_text("contact", &second.contact)
            }
            Self::House(house) => {
                require_positive("price", house.price)?;
                require_positive("area", house.area)?;
                require_text("room", &house.room)?;
                require_text("contact", &house.contact)
            }
            Self::Job(job) => {
                require_text("salary", &job.salary)?;
                require_text("company", &job.company)?;
                require_text("contact", &job.contact)
            }
            Self::Car(car) => {
                require_text("start_place", &car.start_place)?;
                require_text("end_place", &car.end_place)?;
                require_text("time", &car.time)?;
                require_text("contact", &car.contact)
            }
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), CommunityError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field).into());
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> Result<(), CommunityError> {
    if value.is_nan() || value <= 0.0 {
        return Err(ValidationError::Required(field).into());
    }
    Ok(())
}

/// A stored post row with its denormalized counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub category_id: CategoryId,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub images: Vec<String>,
    pub location: Option<String>,
    #[serde(skip_serializing)]
    pub ip: Option<String>,
    pub view_num: i64,
    pub like_num: i64,
    pub share_num: i64,
    pub favorite_num: i64,
    pub comment_num: i64,
    pub status: Status,
    pub is_stick: bool,
    pub is_recommend: bool,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub created_at: Timestamp,
    #[serde(rename = "updatetime", with = "chrono::serde::ts_seconds")]
    pub updated_at: Timestamp,
}

/// A post enriched for display: author card, category name, extension,
/// tags and the viewer's own flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub category_name: Option<String>,
    #[serde(flatten)]
    pub extension: Option<PostExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// A post ready to be inserted together with its extension.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub ip: Option<String>,
    pub extension: Option<PostExtension>,
    pub created_at: Timestamp,
}

impl NewPost {
    #[must_use]
    pub fn post_type(&self) -> PostType {
        self.extension
            .as_ref()
            .map_or(PostType::General, PostExtension::post_type)
    }

    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the title or content is
    /// blank, the title is too long, or the extension misses a required field.
    pub fn validate(&self) -> Result<(), CommunityError> {
        require_text("title", &self.title)?;
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            }
            .into());
        }
        require_text("content", &self.content)?;
        if let Some(extension) = &self.extension {
            extension.validate()?;
        }
        Ok(())
    }
}

/// Filters accepted by the public post list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub post_type: Option<PostType>,
    pub category_id: Option<CategoryId>,
    pub keyword: Option<String>,
}

/// A post as it appears in a user's favorites or view history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedPost {
    pub post_id: PostId,
    pub title: String,
    pub images: Vec<String>,
    pub view_num: i64,
    pub like_num: i64,
    pub comment_num: i64,
    #[serde(rename = "post_createtime", with = "chrono::serde::ts_seconds")]
    pub post_created_at: Timestamp,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    #[serde(rename = "createtime", with = "chrono::serde::ts_seconds")]
    pub saved_at: Timestamp,
}
