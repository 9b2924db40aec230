//! Upload policy: which files each upload kind accepts, and how large.

use std::str::FromStr;

use crate::error::{CommunityError, ValidationError};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UploadKind {
    #[default]
    Image,
    Video,
    File,
}

/// Accepted mime types, file extensions and size ceiling for one [`UploadKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub mime_types: &'static [&'static str],
    pub extensions: &'static [&'static str],
    pub max_bytes: u64,
}

impl UploadKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
        }
    }

    #[must_use]
    pub fn policy(self) -> UploadPolicy {
        match self {
            Self::Image => UploadPolicy {
                mime_types: &["image/jpeg", "image/png", "image/gif"],
                extensions: &["jpg", "jpeg", "png", "gif"],
                max_bytes: 5 * MIB,
            },
            Self::Video => UploadPolicy {
                mime_types: &[
                    "video/mp4",
                    "video/quicktime",
                    "video/x-ms-wmv",
                    "video/x-msvideo",
                ],
                extensions: &["mp4", "mov", "wmv", "avi"],
                max_bytes: 50 * MIB,
            },
            Self::File => UploadPolicy {
                mime_types: &[
                    "application/msword",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    "application/vnd.ms-excel",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    "application/pdf",
                ],
                extensions: &["doc", "docx", "xls", "xlsx", "pdf"],
                max_bytes: 10 * MIB,
            },
        }
    }

    /// Check a received file against the policy of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`CommunityError::Validation`] when the mime type or the
    /// extension is not accepted, or the file is larger than the ceiling.
    pub fn check(self, mime: &str, extension: &str, size: u64) -> Result<(), CommunityError> {
        let policy = self.policy();
        if !policy.mime_types.contains(&mime) {
            return Err(ValidationError::Invalid {
                field: "file",
                reason: "file type not allowed",
            }
            .into());
        }
        if !policy.extensions.contains(&extension) {
            return Err(ValidationError::Invalid {
                field: "file",
                reason: "file extension not allowed",
            }
            .into());
        }
        if size > policy.max_bytes {
            return Err(ValidationError::FileTooLarge {
                limit: policy.max_bytes,
            }
            .into());
        }
        Ok(())
    }
}

impl FromStr for UploadKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "file" => Ok(Self::File),
            _ => Err(ValidationError::Invalid {
                field: "type",
                reason: "expected image, video or file",
            }),
        }
    }
}

/// Lowercased extension of a client file name, if any.
#[must_use]
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
