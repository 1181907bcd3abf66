//! Container image selection.
//!
//! Resolution is pure string composition. Availability is decided against the
//! identifiers reported by the local image store.

use serde::Serialize;

use crate::config::ImageSelection;
use crate::consts::DEFAULT_DIST;

/// The image chosen for this run and whether it was present locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
  pub id: String,
  pub available: bool,
}

/// Pick the image identifier for a selection.
///
/// Precedence: explicit image, then custom repository with the version, then
/// the default distribution with the version.
pub fn resolve_image(selection: &ImageSelection) -> String {
  if let Some(image) = &selection.image {
    return image.clone();
  }

  let repo = selection.repo.as_deref().unwrap_or(DEFAULT_DIST);
  format!("{}:{}", repo, selection.go_version)
}

/// Append the implicit `:latest` tag to an untagged, undigested reference.
///
/// A colon before the last `/` belongs to a registry port, not a tag.
pub fn normalize_reference(image: &str) -> String {
  if image.contains('@') {
    return image.to_string();
  }

  let name = image.rsplit('/').next().unwrap_or(image);
  if name.contains(':') {
    image.to_string()
  } else {
    format!("{}:latest", image)
  }
}

/// Exact match of `image` among locally listed identifiers.
pub fn is_listed<S: AsRef<str>>(image: &str, listed: &[S]) -> bool {
  let wanted = normalize_reference(image);
  listed.iter().any(|id| normalize_reference(id.as_ref()) == wanted)
}
