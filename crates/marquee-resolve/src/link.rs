//! Link resolution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Links are either external URLs or internal page references. Internal
//! references name a page type: singleton pages live at fixed paths, while
//! case studies and legal pages are addressed by the slug of a referenced
//! document.

use serde::{Deserialize, Serialize};

use crate::types::DocumentRef;

/// Path used whenever a link cannot be resolved.
pub const FALLBACK_PATH: &str = "/";

/// Pages that exist exactly once per site and live at a fixed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonPage {
    Homepage,
    ServicesPage,
    CaseStudiesPage,
    ContactPage,
    AboutPage,
}

impl SingletonPage {
    pub fn path(&self) -> &'static str {
        match self {
            SingletonPage::Homepage => "/",
            SingletonPage::ServicesPage => "/services",
            SingletonPage::CaseStudiesPage => "/case-studies",
            SingletonPage::ContactPage => "/contact",
            SingletonPage::AboutPage => "/about",
        }
    }

    /// CMS page type name (`internalPageType`).
    pub fn page_type(&self) -> &'static str {
        match self {
            SingletonPage::Homepage => "homepage",
            SingletonPage::ServicesPage => "servicesPage",
            SingletonPage::CaseStudiesPage => "caseStudiesPage",
            SingletonPage::ContactPage => "contactPage",
            SingletonPage::AboutPage => "aboutPage",
        }
    }

    pub fn all() -> &'static [SingletonPage] {
        &[
            SingletonPage::Homepage,
            SingletonPage::ServicesPage,
            SingletonPage::CaseStudiesPage,
            SingletonPage::ContactPage,
            SingletonPage::AboutPage,
        ]
    }

    pub fn from_page_type(page_type: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|page| page.page_type() == page_type)
    }
}

/// Target of an internal link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalPage {
    Singleton(SingletonPage),
    /// `/case-studies/{slug}`
    CaseStudy { slug: Option<String> },
    /// `/{slug}`
    Legal { slug: Option<String> },
    /// Unrecognized or missing page type, kept for diagnostics.
    Unknown(String),
}

/// A normalized link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReference {
    Internal(InternalPage),
    External { url: Option<String> },
}

impl LinkReference {
    pub fn external(url: impl Into<String>) -> Self {
        LinkReference::External {
            url: Some(url.into()),
        }
    }

    pub fn singleton(page: SingletonPage) -> Self {
        LinkReference::Internal(InternalPage::Singleton(page))
    }

    pub fn case_study(slug: impl Into<String>) -> Self {
        LinkReference::Internal(InternalPage::CaseStudy {
            slug: Some(slug.into()),
        })
    }

    pub fn legal(slug: impl Into<String>) -> Self {
        LinkReference::Internal(InternalPage::Legal {
            slug: Some(slug.into()),
        })
    }

    pub fn is_external(&self) -> bool {
        matches!(self, LinkReference::External { .. })
    }
}

/// A link exactly as the CMS stores it.
///
/// Wire shape:
///
/// ```json
/// { "linkType": "internal", "internalPageType": "caseStudy",
///   "caseStudyReference": { "slug": { "current": "acme" } } }
/// { "linkType": "external", "externalUrl": "https://example.com" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLink {
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub link_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub internal_page_type: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub external_url: Option<String>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub case_study_reference: Option<DocumentRef>,
    #[serde(deserialize_with = "crate::types::deserialize_lenient")]
    pub legal_reference: Option<DocumentRef>,
}

impl RawLink {
    /// Normalize into a [`LinkReference`].
    ///
    /// Only `linkType: "external"` produces an external link; anything else,
    /// including a missing type, is treated as internal.
    pub fn normalize(&self) -> LinkReference {
        if self.link_type.as_deref() == Some("external") {
            return LinkReference::External {
                url: self.external_url.clone().filter(|u| !u.is_empty()),
            };
        }

        let page_type = self.internal_page_type.as_deref().unwrap_or_default();
        let slug_of = |reference: &Option<DocumentRef>| {
            reference
                .as_ref()
                .and_then(DocumentRef::slug)
                .map(str::to_string)
        };

        let page = match page_type {
            "caseStudy" => InternalPage::CaseStudy {
                slug: slug_of(&self.case_study_reference),
            },
            "legal" => InternalPage::Legal {
                slug: slug_of(&self.legal_reference),
            },
            other => SingletonPage::from_page_type(other)
                .map(InternalPage::Singleton)
                .unwrap_or_else(|| InternalPage::Unknown(other.to_string())),
        };
        LinkReference::Internal(page)
    }
}

/// Resolve a link to the URL to put in `href`.
///
/// Never fails: a reference-bearing page without a slug, an unknown page
/// type, or an external link without a URL all resolve to `/`.
pub fn resolve_link_url(link: &LinkReference) -> String {
    match link {
        LinkReference::External { url: Some(url) } => url.clone(),
        LinkReference::External { url: None } => {
            tracing::debug!("External link without a URL, using fallback path");
            FALLBACK_PATH.to_string()
        }
        LinkReference::Internal(page) => match page {
            InternalPage::Singleton(page) => page.path().to_string(),
            InternalPage::CaseStudy { slug: Some(slug) } => format!("/case-studies/{slug}"),
            InternalPage::Legal { slug: Some(slug) } => format!("/{slug}"),
            InternalPage::CaseStudy { slug: None } | InternalPage::Legal { slug: None } => {
                tracing::debug!(?page, "Internal link is missing its document reference");
                FALLBACK_PATH.to_string()
            }
            InternalPage::Unknown(page_type) => {
                tracing::debug!(page_type = %page_type, "Unknown internal page type");
                FALLBACK_PATH.to_string()
            }
        },
    }
}

/// Only external links open in a new tab.
pub fn should_open_in_new_tab(link: &LinkReference) -> bool {
    link.is_external()
}

/// Anchor attributes for a resolved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAttributes {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<&'static str>,
    pub new_tab: bool,
}

/// Resolve a link into `href`, plus `target`/`rel` when it opens a new tab.
pub fn link_attributes(link: &LinkReference) -> LinkAttributes {
    let new_tab = should_open_in_new_tab(link);
    LinkAttributes {
        href: resolve_link_url(link),
        target: new_tab.then_some("_blank"),
        rel: new_tab.then_some("noopener noreferrer"),
        new_tab,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(value: serde_json::Value) -> LinkReference {
        serde_json::from_value::<RawLink>(value).unwrap().normalize()
    }

    #[test]
    fn test_singleton_paths() {
        let cases = [
            ("homepage", "/"),
            ("servicesPage", "/services"),
            ("caseStudiesPage", "/case-studies"),
            ("contactPage", "/contact"),
            ("aboutPage", "/about"),
        ];
        for (page_type, path) in cases {
            let resolved = link(json!({ "linkType": "internal", "internalPageType": page_type }));
            assert_eq!(resolve_link_url(&resolved), path, "page type {page_type}");
        }
    }

    #[test]
    fn test_case_study_with_reference() {
        let resolved = link(json!({
            "linkType": "internal",
            "internalPageType": "caseStudy",
            "caseStudyReference": { "slug": { "current": "acme" } }
        }));
        assert_eq!(resolve_link_url(&resolved), "/case-studies/acme");
    }

    #[test]
    fn test_case_study_without_reference_falls_back() {
        let resolved = link(json!({ "linkType": "internal", "internalPageType": "caseStudy" }));
        assert_eq!(resolve_link_url(&resolved), "/");

        let empty_slug = link(json!({
            "linkType": "internal",
            "internalPageType": "caseStudy",
            "caseStudyReference": { "slug": {} }
        }));
        assert_eq!(resolve_link_url(&empty_slug), "/");
    }

    #[test]
    fn test_legal_uses_root_slug() {
        let resolved = link(json!({
            "linkType": "internal",
            "internalPageType": "legal",
            "legalReference": { "slug": { "current": "privacy-policy" } }
        }));
        assert_eq!(resolve_link_url(&resolved), "/privacy-policy");

        let missing = link(json!({ "linkType": "internal", "internalPageType": "legal" }));
        assert_eq!(resolve_link_url(&missing), "/");
    }

    #[test]
    fn test_reference_of_other_type_is_ignored() {
        // A case study link only looks at caseStudyReference
        let resolved = link(json!({
            "linkType": "internal",
            "internalPageType": "caseStudy",
            "legalReference": { "slug": { "current": "terms" } }
        }));
        assert_eq!(resolve_link_url(&resolved), "/");
    }

    #[test]
    fn test_unknown_or_missing_page_type_falls_back() {
        let unknown = link(json!({ "linkType": "internal", "internalPageType": "blogPost" }));
        assert_eq!(unknown, LinkReference::Internal(InternalPage::Unknown("blogPost".into())));
        assert_eq!(resolve_link_url(&unknown), "/");

        let missing = link(json!({}));
        assert_eq!(resolve_link_url(&missing), "/");
        assert!(!should_open_in_new_tab(&missing));
    }

    #[test]
    fn test_external_link_is_verbatim_and_new_tab() {
        let resolved = link(json!({ "linkType": "external", "externalUrl": "https://x.com" }));
        assert_eq!(resolve_link_url(&resolved), "https://x.com");
        assert!(should_open_in_new_tab(&resolved));
    }

    #[test]
    fn test_external_link_without_url() {
        let resolved = link(json!({ "linkType": "external", "externalUrl": "" }));
        assert_eq!(resolve_link_url(&resolved), "/");
        assert!(should_open_in_new_tab(&resolved));
    }

    #[test]
    fn test_internal_links_never_open_new_tab() {
        for page in SingletonPage::all() {
            assert!(!should_open_in_new_tab(&LinkReference::singleton(*page)));
        }
        assert!(!should_open_in_new_tab(&LinkReference::case_study("acme")));
        assert!(!should_open_in_new_tab(&LinkReference::legal("terms")));
    }

    #[test]
    fn test_link_attributes() {
        let external = link_attributes(&LinkReference::external("https://x.com"));
        assert_eq!(external.href, "https://x.com");
        assert_eq!(external.target, Some("_blank"));
        assert_eq!(external.rel, Some("noopener noreferrer"));
        assert!(external.new_tab);

        let internal = link_attributes(&LinkReference::case_study("acme"));
        assert_eq!(internal.href, "/case-studies/acme");
        assert_eq!(internal.target, None);
        assert_eq!(internal.rel, None);

        let json = serde_json::to_value(&internal).unwrap();
        assert_eq!(json, json!({ "href": "/case-studies/acme", "newTab": false }));
    }

    #[test]
    fn test_wrongly_typed_fields_are_dropped() {
        let resolved = link(json!({ "linkType": "external", "externalUrl": 42 }));
        assert_eq!(resolved, LinkReference::External { url: None });
        assert_eq!(resolve_link_url(&resolved), "/");

        let resolved = link(json!({
            "linkType": "internal",
            "internalPageType": "caseStudy",
            "caseStudyReference": "acme"
        }));
        assert_eq!(resolve_link_url(&resolved), "/");
    }
}
