//! Web-font inlining for exports.
//!
//! The capture must not depend on fonts that only the live page has
//! loaded. Before capturing we fetch every font stylesheet the page links,
//! pull the `@font-face` rules out of them and download the faces the
//! rasterizer can read.

use crate::error::FontError;
use async_trait::async_trait;
use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, opt, preceded, repeat, separated};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Where stylesheets and font files come from.
#[async_trait(?Send)]
pub trait FontSource {
    /// Stylesheets to inline, in document order.
    fn stylesheet_urls(&self) -> Vec<String>;

    async fn fetch_text(&self, url: &str) -> Result<String, FontError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError>;
}

/// One `@font-face` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub family: String,
    /// The `src` entry picked for loading.
    pub src: String,
    pub format: Option<String>,
    pub weight: String,
    pub style: String,
}

impl FontFace {
    /// Whether the rasterizer can load this face (TrueType or OpenType).
    pub fn is_loadable(&self) -> bool {
        match self.format.as_deref() {
            Some(f) => is_sfnt_format(f),
            None => {
                let path = self.src.split(['?', '#']).next().unwrap_or_default();
                let lower = path.to_ascii_lowercase();
                lower.ends_with(".ttf") || lower.ends_with(".otf")
            }
        }
    }
}

fn is_sfnt_format(format: &str) -> bool {
    matches!(format, "truetype" | "opentype")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFace {
    pub family: String,
    pub data: Vec<u8>,
}

/// Everything an export needs to draw text without the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontBundle {
    /// Concatenated stylesheet text, embeddable as-is.
    pub css: String,
    pub faces: Vec<LoadedFace>,
}

impl FontBundle {
    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.faces.is_empty()
    }
}

/// Fetch every stylesheet and every loadable face from `source`.
///
/// Failed fetches are logged and skipped: an export with a fallback font
/// beats no export.
pub async fn prepare_font_bundle<S: FontSource + ?Sized>(source: &S) -> FontBundle {
    let mut bundle = FontBundle::default();

    for url in source.stylesheet_urls() {
        match source.fetch_text(&url).await {
            Ok(text) => {
                bundle.css.push_str(&text);
                bundle.css.push('\n');
            }
            Err(e) => log::warn!("skipping font stylesheet: {e}"),
        }
    }

    let mut seen: Vec<String> = Vec::new();
    for face in parse_font_faces(&bundle.css) {
        if !face.is_loadable() || seen.contains(&face.src) {
            continue;
        }
        seen.push(face.src.clone());
        match source.fetch_bytes(&face.src).await {
            Ok(data) => {
                log::debug!("loaded font face {} ({} bytes)", face.family, data.len());
                bundle.faces.push(LoadedFace {
                    family: face.family,
                    data,
                });
            }
            Err(e) => log::warn!("skipping font face {}: {e}", face.family),
        }
    }

    bundle
}

// ─── @font-face parser ──────────────────────────────────────────────────

/// Extract the `@font-face` rules of a stylesheet. Malformed rules are skipped.
pub fn parse_font_faces(css: &str) -> Vec<FontFace> {
    let mut faces = Vec::new();
    let mut rest = css;

    while let Some(pos) = rest.find("@font-face") {
        rest = &rest[pos + "@font-face".len()..];
        match parse_rule_body.parse_next(&mut rest) {
            Ok(decls) => {
                if let Some(face) = face_from_declarations(&decls) {
                    faces.push(face);
                }
            }
            Err(e) => log::debug!("unparseable @font-face rule: {e}"),
        }
    }

    faces
}

fn face_from_declarations(decls: &[(&str, &str)]) -> Option<FontFace> {
    let value = |name: &str| {
        decls
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
    };

    let family = unquote(value("font-family")?).to_string();
    let mut src = value("src")?;
    let entries = parse_src_list.parse_next(&mut src).ok()?;
    // Prefer a face the rasterizer reads, else the first url
    let (url, format) = entries
        .iter()
        .find(|(_, f)| f.is_some_and(is_sfnt_format))
        .or_else(|| entries.first())?;

    Some(FontFace {
        family,
        src: (*url).to_string(),
        format: format.map(str::to_string),
        weight: value("font-weight").unwrap_or("400").to_string(),
        style: value("font-style").unwrap_or("normal").to_string(),
    })
}

fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')))
        .unwrap_or(s)
}

/// `{ name: value; ... }`
fn parse_rule_body<'a>(input: &mut &'a str) -> ModalResult<Vec<(&'a str, &'a str)>> {
    delimited(
        (multispace0, '{'),
        repeat(0.., preceded(multispace0, parse_declaration)),
        (multispace0, '}'),
    )
    .parse_next(input)
}

fn parse_declaration<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    let name = take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)?;
    let _ = (multispace0, ':', multispace0).parse_next(input)?;
    let value: &str = take_till(0.., |c: char| c == ';' || c == '}').parse_next(input)?;
    let _ = opt(';').parse_next(input)?;
    Ok((name, value.trim()))
}

/// `url(a) format('truetype'), local(X), url(b)` → urls with their formats.
fn parse_src_list<'a>(input: &mut &'a str) -> ModalResult<Vec<(&'a str, Option<&'a str>)>> {
    let entries: Vec<Option<(&str, Option<&str>)>> =
        separated(1.., preceded(multispace0, parse_src_entry), (multispace0, ',')).parse_next(input)?;
    Ok(entries.into_iter().flatten().collect())
}

fn parse_src_entry<'a>(input: &mut &'a str) -> ModalResult<Option<(&'a str, Option<&'a str>)>> {
    alt((
        (parse_css_fn("url"), opt(preceded(multispace0, parse_css_fn("format"))))
            .map(|(url, format)| Some((url, format))),
        parse_css_fn("local").map(|_| None),
    ))
    .parse_next(input)
}

/// `name( value )` with the value optionally quoted.
fn parse_css_fn<'a>(name: &'static str) -> impl Parser<&'a str, &'a str, winnow::error::ErrMode<winnow::error::ContextError>> {
    delimited(
        (name, '(', multispace0),
        alt((
            delimited('"', take_till(0.., '"'), '"'),
            delimited('\'', take_till(0.., '\''), '\''),
            take_till(1.., |c: char| c == ')' || c.is_whitespace()),
        )),
        (multispace0, ')'),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const GOOGLE_CSS: &str = r#"
/* latin */
@font-face {
  font-family: 'Roboto';
  font-style: normal;
  font-weight: 700;
  src: url(https://fonts.gstatic.com/s/roboto/v30/KFOlCnqEu92Fr1MmWUlfBBc4.ttf) format('truetype');
}
/* cyrillic */
@font-face {
  font-family: "Bangers";
  src: local("Bangers"), url("https://fonts.gstatic.com/s/bangers/b.woff2") format("woff2"),
       url('https://fonts.gstatic.com/s/bangers/b.ttf') format('truetype');
}
"#;

    #[test]
    fn parses_google_stylesheet() {
        let faces = parse_font_faces(GOOGLE_CSS);
        assert_eq!(faces.len(), 2);

        assert_eq!(
            faces[0],
            FontFace {
                family: "Roboto".into(),
                src: "https://fonts.gstatic.com/s/roboto/v30/KFOlCnqEu92Fr1MmWUlfBBc4.ttf".into(),
                format: Some("truetype".into()),
                weight: "700".into(),
                style: "normal".into(),
            }
        );

        // TrueType wins over an earlier woff2
        assert_eq!(faces[1].family, "Bangers");
        assert_eq!(faces[1].src, "https://fonts.gstatic.com/s/bangers/b.ttf");
        assert_eq!(faces[1].weight, "400");
    }

    #[test]
    fn woff2_only_face_is_not_loadable() {
        let css = "@font-face { font-family: X; src: url(x.woff2) format('woff2'); }";
        let faces = parse_font_faces(css);
        assert_eq!(faces.len(), 1);
        assert!(!faces[0].is_loadable());
    }

    #[test]
    fn unformatted_ttf_is_loadable() {
        let css = "@font-face{font-family:Y;src:url(/fonts/y.TTF?v=2)}";
        let faces = parse_font_faces(css);
        assert!(faces[0].is_loadable());
    }

    #[test]
    fn malformed_rule_is_skipped() {
        // No src, then no rule body
        let css = "@font-face { font-family: A; }\n@font-face font-family: B; src: url(b.ttf);";
        assert!(parse_font_faces(css).is_empty());
    }

    struct FakeSource {
        sheets: Vec<String>,
        files: HashMap<String, String>,
    }

    #[async_trait(?Send)]
    impl FontSource for FakeSource {
        fn stylesheet_urls(&self) -> Vec<String> {
            self.sheets.clone()
        }

        async fn fetch_text(&self, url: &str) -> Result<String, FontError> {
            self.files.get(url).cloned().ok_or_else(|| FontError::Fetch {
                url: url.to_string(),
                reason: "404".into(),
            })
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FontError> {
            self.fetch_text(url).await.map(String::into_bytes)
        }
    }

    #[tokio::test]
    async fn bundle_skips_failed_fetches() {
        let mut files = HashMap::new();
        files.insert("https://fonts.googleapis.com/css?family=Roboto".to_string(), GOOGLE_CSS.to_string());
        files.insert(
            "https://fonts.gstatic.com/s/roboto/v30/KFOlCnqEu92Fr1MmWUlfBBc4.ttf".to_string(),
            "ROBOTO".to_string(),
        );
        let source = FakeSource {
            sheets: vec![
                "https://fonts.googleapis.com/css?family=Missing".into(),
                "https://fonts.googleapis.com/css?family=Roboto".into(),
            ],
            files,
        };

        let bundle = prepare_font_bundle(&source).await;
        assert!(bundle.css.contains("Roboto"));
        // Bangers' ttf is missing and skipped
        assert_eq!(
            bundle.faces,
            vec![LoadedFace {
                family: "Roboto".into(),
                data: b"ROBOTO".to_vec(),
            }]
        );
    }

    #[tokio::test]
    async fn no_stylesheets_gives_empty_bundle() {
        let source = FakeSource {
            sheets: vec![],
            files: HashMap::new(),
        };
        assert!(prepare_font_bundle(&source).await.is_empty());
    }
}
