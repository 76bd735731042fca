use roxmltree::Document;

/// Classify an import-API response body.
///
/// Only a `<status>` element equal to `OK` (case-insensitive, root or
/// nested) counts as success, matching the platform's lineup-submit flow.
/// Anything else, including non-XML bodies and `<error>` documents, is a
/// failure. The returned message favors parsed status/error text and falls
/// back to the trimmed raw body.
pub fn parse_import_response(body: &str) -> (bool, String) {
    let stripped = body.trim();

    let mut ok = false;
    let mut message = String::new();

    if !stripped.is_empty() {
        if let Ok(doc) = Document::parse(stripped) {
            let root = doc.root_element();
            if root.tag_name().name().eq_ignore_ascii_case("status") {
                message = root.text().unwrap_or("").trim().to_string();
                ok = message.eq_ignore_ascii_case("OK");
            } else if let Some(status) = doc
                .descendants()
                .find(|n| n.has_tag_name("status"))
            {
                message = status.text().unwrap_or("").trim().to_string();
                ok = message.eq_ignore_ascii_case("OK");
            } else if let Some(error) = doc.descendants().find(|n| n.has_tag_name("error")) {
                message = error.text().unwrap_or("").trim().to_string();
            }
        }
    }

    if message.is_empty() {
        message = stripped.to_string();
    }

    (ok, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect a bare OK status to classify as success
    #[test]
    fn root_status_ok() {
        let (ok, message) = parse_import_response("<status>OK</status>");
        assert!(ok);
        assert_eq!(message, "OK");
    }

    /// Expect a nested status element to be found
    #[test]
    fn nested_status_ok() {
        let (ok, _) = parse_import_response("<response><status>ok</status></response>");
        assert!(ok);
    }

    /// Expect an error element to classify as failure with its text
    #[test]
    fn error_element_fails() {
        let (ok, message) =
            parse_import_response("<error>Invalid franchise for this league</error>");
        assert!(!ok);
        assert_eq!(message, "Invalid franchise for this league");
    }

    /// Expect non-XML bodies to fail with the trimmed body as message
    #[test]
    fn plain_text_fails() {
        let (ok, message) = parse_import_response("  something went wrong  ");
        assert!(!ok);
        assert_eq!(message, "something went wrong");
    }

    /// Expect a status other than OK to fail but keep the message
    #[test]
    fn non_ok_status_fails() {
        let (ok, message) = parse_import_response("<status>Trade pending approval</status>");
        assert!(!ok);
        assert_eq!(message, "Trade pending approval");
    }

    /// Expect the empty body to fail with an empty message
    #[test]
    fn empty_body_fails() {
        let (ok, message) = parse_import_response("");
        assert!(!ok);
        assert!(message.is_empty());
    }
}
