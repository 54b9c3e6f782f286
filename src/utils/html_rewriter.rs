//! Anchor `href` rewriting for HTML documents.

use lol_html::errors::RewritingError;
use lol_html::{RewriteStrSettings, element, rewrite_str};

/// Replaces the `href` of every `<a>` element with the value returned by `rewrite`.
///
/// The document is tokenized, so markup inside comments, `<script>` or other
/// raw-text elements is never treated as an anchor. `rewrite` receives the URL
/// with character references decoded. Anchors without an `href`, or with an
/// empty one, are left untouched, and untouched markup is passed through as is.
///
/// # Errors
///
/// Returns [`RewritingError`] if the rewriter rejects the document or the new
/// attribute value.
pub fn rewrite_anchor_hrefs<F>(html: &str, mut rewrite: F) -> Result<String, RewritingError>
where
    F: FnMut(&str) -> String,
{
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a[href]", |el| {
                let Some(href) = el.get_attribute("href") else {
                    return Ok(());
                };

                let original = html_escape::decode_html_entities(href.trim());
                if original.is_empty() {
                    return Ok(());
                }

                let target = rewrite(&original);
                el.set_attribute("href", &target)?;
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(html: &str) -> (String, Vec<String>) {
        let mut seen = Vec::new();
        let out = rewrite_anchor_hrefs(html, |url| {
            seen.push(url.to_string());
            format!("http://s/{}", seen.len())
        })
        .unwrap();
        (out, seen)
    }

    #[test]
    fn test_rewrites_quoted_and_unquoted_hrefs() {
        let html = r#"<p><a href="https://a.com">A</a> <A class='x' HREF='https://b.com'>B</A> <a href=https://c.com>C</a></p>"#;

        let (out, seen) = collect(html);

        assert_eq!(seen, vec!["https://a.com", "https://b.com", "https://c.com"]);
        assert!(out.contains(r#"href="http://s/1""#));
        assert!(out.contains("http://s/2"));
        assert!(out.contains(r#"href="http://s/3""#));
        assert!(!out.contains("https://"));
        assert!(out.starts_with("<p>") && out.ends_with("</p>"));
    }

    #[test]
    fn test_skips_anchors_without_href() {
        let html = r#"<a name="top">x</a><a href="">y</a><link href="https://style.css">"#;

        let out = rewrite_anchor_hrefs(html, |_| panic!("nothing to rewrite")).unwrap();

        assert_eq!(out, html);
    }

    #[test]
    fn test_ignores_attributes_ending_in_href() {
        let html = r#"<a data-href="https://ignored.com" href="https://real.com">x</a>"#;

        let (out, seen) = collect(html);

        assert_eq!(seen, vec!["https://real.com"]);
        assert!(out.contains(r#"data-href="https://ignored.com""#));
        assert!(out.contains(r#"href="http://s/1""#));
    }

    #[test]
    fn test_gt_inside_quoted_attribute_does_not_end_tag() {
        let html = r#"<a title="a > b" href="https://real.com">x</a>"#;

        let (out, seen) = collect(html);

        assert_eq!(seen, vec!["https://real.com"]);
        assert!(out.contains(r#"title="a > b""#));
        assert!(out.contains(r#"href="http://s/1""#));
    }

    #[test]
    fn test_ignores_anchors_in_comments_and_scripts() {
        let html = concat!(
            r#"<!-- <a href="https://hidden.com">old</a> -->"#,
            r#"<script>var s = '<a href="https://script.com">';</script>"#,
            r#"<a href="https://shown.com">x</a>"#,
        );

        let (out, seen) = collect(html);

        assert_eq!(seen, vec!["https://shown.com"]);
        assert!(out.contains("https://hidden.com"));
        assert!(out.contains("https://script.com"));
    }

    #[test]
    fn test_decodes_character_references() {
        let html = concat!(
            r#"<a href="https://a.com/?x=1&amp;y=2">q</a>"#,
            r#"<a href="https://b.com/?q=&#38;x&lt;">r</a>"#,
        );

        let (_, seen) = collect(html);

        assert_eq!(seen, vec!["https://a.com/?x=1&y=2", "https://b.com/?q=&x<"]);
    }
}
