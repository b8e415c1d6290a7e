//! # PIDL Resources
//!
//! The Payment Instrument Description Language tree the service returns for
//! clients to render. The service only builds these; rendering happens in
//! the PIDL SDK.
//!
//! A [`PidlResource`] is identified by a string map (`description_type`,
//! `id`, ...) and carries a list of [`DisplayHint`] pages. Hints form a
//! tree: pages and groups hold members, leaves are text, buttons, images,
//! iframes, hyperlinks and bound properties.

use std::collections::BTreeMap;

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PxCoreError;

/// Action attached to a button or hyperlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PidlAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default)]
    pub is_default: bool,
}

impl PidlAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            context: None,
            is_default: false,
        }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn default_action(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// A single UI element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "displayType", rename_all = "camelCase")]
pub enum DisplayHint {
    #[serde(rename_all = "camelCase")]
    Page {
        display_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
        #[serde(default)]
        members: Vec<DisplayHint>,
    },
    #[serde(rename_all = "camelCase")]
    Group {
        display_id: String,
        #[serde(default)]
        members: Vec<DisplayHint>,
    },
    #[serde(rename_all = "camelCase")]
    Text {
        display_id: String,
        #[serde(default)]
        display_content: String,
    },
    #[serde(rename_all = "camelCase")]
    Button {
        display_id: String,
        #[serde(default)]
        display_content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pidl_action: Option<PidlAction>,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        display_id: String,
        source_url: String,
    },
    #[serde(rename_all = "camelCase")]
    Iframe {
        display_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_content: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Hyperlink {
        display_id: String,
        #[serde(default)]
        display_content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pidl_action: Option<PidlAction>,
    },
    #[serde(rename_all = "camelCase")]
    Property {
        display_id: String,
        property_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
}

impl DisplayHint {
    pub fn display_id(&self) -> &str {
        match self {
            Self::Page { display_id, .. }
            | Self::Group { display_id, .. }
            | Self::Text { display_id, .. }
            | Self::Button { display_id, .. }
            | Self::Image { display_id, .. }
            | Self::Iframe { display_id, .. }
            | Self::Hyperlink { display_id, .. }
            | Self::Property { display_id, .. } => display_id,
        }
    }

    pub fn members(&self) -> &[DisplayHint] {
        match self {
            Self::Page { members, .. } | Self::Group { members, .. } => members,
            _ => &[],
        }
    }

    /// Depth-first search for `id` starting at (and including) this hint.
    pub fn find(&self, id: &str) -> Option<&DisplayHint> {
        if self.display_id() == id {
            return Some(self);
        }
        self.members().iter().find_map(|m| m.find(id))
    }

    pub fn page(id: impl Into<String>, members: Vec<DisplayHint>) -> Self {
        Self::Page {
            display_id: id.into(),
            display_name: None,
            members,
        }
    }

    pub fn group(id: impl Into<String>, members: Vec<DisplayHint>) -> Self {
        Self::Group {
            display_id: id.into(),
            members,
        }
    }

    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text {
            display_id: id.into(),
            display_content: content.into(),
        }
    }

    pub fn button(id: impl Into<String>, content: impl Into<String>, action: PidlAction) -> Self {
        Self::Button {
            display_id: id.into(),
            display_content: content.into(),
            pidl_action: Some(action),
        }
    }

    pub fn image(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self::Image {
            display_id: id.into(),
            source_url: source_url.into(),
        }
    }

    pub fn iframe(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self::Iframe {
            display_id: id.into(),
            source_url: Some(source_url.into()),
            display_content: None,
        }
    }

    pub fn property(id: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self::Property {
            display_id: id.into(),
            property_name: property_name.into(),
            display_name: None,
        }
    }
}

/// A PIDL resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PidlResource {
    pub identity: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_description: Option<Vec<DisplayHint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_description: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strings: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_action: Option<Value>,
}

impl PidlResource {
    /// A resource identified by `description_type` and `id`.
    pub fn new(description_type: impl Into<String>, id: impl Into<String>) -> Self {
        let mut identity = BTreeMap::new();
        identity.insert("description_type".to_string(), description_type.into());
        identity.insert("id".to_string(), id.into());
        Self {
            identity,
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.identity.insert(key.into(), value.into());
        self
    }

    pub fn with_pages(mut self, pages: Vec<DisplayHint>) -> Self {
        self.display_description = Some(pages);
        self
    }

    pub fn with_data_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.data_description
            .get_or_insert_with(Map::new)
            .insert(name.into(), value);
        self
    }

    pub fn identity_value(&self, key: &str) -> Option<&str> {
        self.identity.get(key).map(String::as_str)
    }

    /// Depth-first search across every page.
    pub fn find_display_hint(&self, id: &str) -> Option<&DisplayHint> {
        self.display_description
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find_map(|page| page.find(id))
    }
}

/// PNG image of a QR code encoding `url`.
pub fn qr_code_png(url: &str) -> Result<Vec<u8>, PxCoreError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| PxCoreError::QrCode(e.to_string()))?;
    let image = code.render::<Luma<u8>>().build();
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| PxCoreError::QrCode(e.to_string()))?;
    Ok(png.into_inner())
}

/// `data:image/png;base64,` image source for a QR code encoding `url`.
pub fn qr_code_source(url: &str) -> Result<String, PxCoreError> {
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(qr_code_png(url)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PidlResource {
        PidlResource::new("challenge", "paypalQrCode").with_pages(vec![
            DisplayHint::page(
                "paypalQrCodeChallengePage",
                vec![
                    DisplayHint::text("paypalQrCodeChallengeHeading", "Scan to sign in"),
                    DisplayHint::group(
                        "qrCodeGroup",
                        vec![DisplayHint::image(
                            "paypalQrCodeImage",
                            qr_code_source("https://paypal.example/x").unwrap(),
                        )],
                    ),
                ],
            ),
            DisplayHint::page(
                "paypalQrCodeChallengePage2",
                vec![DisplayHint::button(
                    "okButton",
                    "OK",
                    PidlAction::new("success").default_action(),
                )],
            ),
        ])
    }

    #[test]
    fn finds_nested_hints_across_pages() {
        let pidl = sample();
        let image = pidl.find_display_hint("paypalQrCodeImage").unwrap();
        assert!(matches!(image, DisplayHint::Image { .. }));
        assert!(pidl.find_display_hint("okButton").is_some());
        assert!(pidl.find_display_hint("missing").is_none());
    }

    #[test]
    fn display_type_tag_on_the_wire() {
        let v = serde_json::to_value(sample()).unwrap();
        let page = &v["displayDescription"][0];
        assert_eq!(page["displayType"], "page");
        assert_eq!(page["members"][1]["members"][0]["displayType"], "image");
        assert_eq!(v["identity"]["description_type"], "challenge");
    }

    #[test]
    fn deserializes_button_with_action() {
        let raw = json!({
            "displayType": "button",
            "displayId": "saveButton",
            "displayContent": "Save",
            "pidlAction": { "type": "submit", "context": { "href": "https://px/x" }, "isDefault": true }
        });
        let hint: DisplayHint = serde_json::from_value(raw).unwrap();
        match hint {
            DisplayHint::Button { pidl_action: Some(a), .. } => {
                assert_eq!(a.action_type, "submit");
                assert!(a.is_default);
            }
            other => panic!("unexpected hint {other:?}"),
        }
    }

    #[test]
    fn qr_code_source_is_a_png_data_url() {
        let src = qr_code_source("https://pay.example/r/1").unwrap();
        let encoded = src.strip_prefix("data:image/png;base64,").unwrap();
        let png = STANDARD.decode(encoded).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(png, qr_code_png("https://pay.example/r/1").unwrap());
    }

    #[test]
    fn oversized_urls_do_not_render() {
        let url = format!("https://pay.example/{}", "x".repeat(8000));
        assert!(matches!(qr_code_source(&url), Err(PxCoreError::QrCode(_))));
    }
}
