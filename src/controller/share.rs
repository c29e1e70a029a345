// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only share links and their QR codes.

use crate::codec;
use crate::models::Session;
use qrcode::{render::svg, EcLevel, QrCode};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Minimum rendered QR code size in pixels.
const QR_MIN_SIZE: u32 = 256;

/// Share surface for a session.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ShareLink {
    /// Absolute URL of the read-only view.
    pub url: String,
    /// SVG QR code of `url`; absent when the URL is too long to encode.
    pub qr_svg: Option<String>,
}

/// Absolute read-only URL. The session itself is left untouched.
pub fn readonly_url(session: &Session, base_url: &str) -> String {
    let shared = session.as_readonly();
    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        codec::state_path(&shared.accounts, &shared.profile)
    )
}

/// Read-only URL plus its QR code.
pub fn share_link(session: &Session, base_url: &str) -> ShareLink {
    let url = readonly_url(session, base_url);
    let qr_svg = match QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H) {
        Ok(code) => Some(
            code.render::<svg::Color<'_>>()
                .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
                .build(),
        ),
        Err(e) => {
            tracing::warn!(url_len = url.len(), error = %e, "Share URL does not fit in a QR code");
            None
        }
    };

    ShareLink { url, qr_svg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Platform, Profile};

    fn session() -> Session {
        Session::new(
            vec![Account::new(Platform::Github, "alice", None)],
            Profile {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                readonly: false,
            },
        )
    }

    #[test]
    fn test_share_url_is_readonly() {
        let original = session();
        let link = share_link(&original, "https://contributions.example.com/");

        let segment = link
            .url
            .strip_prefix("https://contributions.example.com/contributions/")
            .expect("share URL should use the contributions path");
        let shared = codec::decode(segment);

        assert!(shared.profile.readonly);
        assert_eq!(shared.accounts, original.accounts);
        // The editable session is not modified
        assert!(!original.profile.readonly);
    }

    #[test]
    fn test_share_link_renders_qr_svg() {
        let link = share_link(&session(), "https://contributions.example.com");
        let svg = link.qr_svg.expect("short URLs fit in a QR code");
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_oversized_url_has_no_qr() {
        let accounts = (0..200)
            .map(|i| Account::new(Platform::Gitlab, format!("user{}", i), Some("x".repeat(40))))
            .collect();
        let link = share_link(
            &Session::new(accounts, Profile::default()),
            "https://contributions.example.com",
        );
        assert!(link.qr_svg.is_none());
    }
}
