//! Final answer handed back to the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Serialize, Serializer};

use crate::mosaic::EncodedImage;
use crate::SelectionOutcome;

/// How complete the answer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Cover image found and transformed.
    Ok,
    /// Nothing usable was found.
    NoResult,
    /// A result was found but its cover image could not be produced.
    Degraded,
}

fn serialize_image<S>(image: &Option<EncodedImage>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match image {
        Some(image) => serializer.serialize_some(&STANDARD.encode(&image.bytes)),
        None => serializer.serialize_none(),
    }
}

/// Answer for one lookup. Failures are expressed through `status`, never
/// as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: ResponseStatus,
    /// Cover image, base64 encoded when serialized.
    #[serde(serialize_with = "serialize_image")]
    pub image: Option<EncodedImage>,
    pub title: Option<String>,
    pub link: Option<String>,
    /// Human-readable summary.
    pub message: String,
}

impl Response {
    /// Nothing found for `code`; points at a web search instead.
    pub fn no_result(code: &str) -> Self {
        let query = urlencoding::encode(&format!("{} jav", code)).into_owned();
        Self::plain(
            ResponseStatus::NoResult,
            format!(
                "Nothing found for \"{}\". Try a web search: https://www.google.com/search?q={}",
                code, query
            ),
        )
    }

    /// Every dispatched source failed.
    pub fn unreachable(code: &str) -> Self {
        Self::plain(
            ResponseStatus::NoResult,
            format!("All sources unreachable while searching \"{}\"", code),
        )
    }

    /// The input had no usable code.
    pub fn invalid_input(input: &str) -> Self {
        Self::plain(
            ResponseStatus::NoResult,
            format!("No valid code found in \"{}\"", input),
        )
    }

    fn plain(status: ResponseStatus, message: String) -> Self {
        Self {
            status,
            image: None,
            title: None,
            link: None,
            message,
        }
    }

    /// Returns whether an image is attached.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Image as a `base64://` payload for chat transports.
    pub fn image_base64(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("base64://{}", STANDARD.encode(&image.bytes)))
    }
}

/// Assembles the answer from the selection and the transformed cover.
///
/// Without an image the answer degrades to title and link, whatever
/// `return_details` says.
pub fn compose(
    code: &str,
    outcome: &SelectionOutcome,
    image: Option<EncodedImage>,
    return_details: bool,
) -> Response {
    let Some(candidate) = outcome.candidate() else {
        return Response::no_result(code);
    };

    let title = candidate.display_title();
    let details = format!("{}\n{}", title, candidate.link);

    match image {
        Some(image) => {
            let (title, link, message) = if return_details {
                (Some(title), Some(candidate.link.clone()), details)
            } else {
                (None, None, String::new())
            };
            Response {
                status: ResponseStatus::Ok,
                image: Some(image),
                title,
                link,
                message,
            }
        }
        None => Response {
            status: ResponseStatus::Degraded,
            image: None,
            title: Some(title),
            link: Some(candidate.link.clone()),
            message: details,
        },
    }
}
