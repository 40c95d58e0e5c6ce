//! Neutralizing free text before it is sent to the backend.

/// Turns user-entered text into something safe to render as HTML.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, input: &str) -> String;
}

/// Escapes the characters that let text break out into markup.
///
/// `<script>` becomes `&lt;script&gt;`, so the browser renders it as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Sanitizer for HtmlEscaper {
    fn sanitize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for ch in input.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                _ => out.push(ch),
            }
        }
        out
    }
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn sanitize(&self, input: &str) -> String {
        self(input)
    }
}
