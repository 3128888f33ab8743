use std::borrow::Cow;

/// Normalize a payload so it occupies exactly one protocol line.
///
/// Embedded `\n` becomes `\r`; the wire protocol reserves `\n` for message
/// framing, so content must never carry one.
pub fn normalize_line(text: &str) -> Cow<'_, str> {
    if text.contains('\n') {
        Cow::Owned(text.replace('\n', "\r"))
    } else {
        Cow::Borrowed(text)
    }
}
