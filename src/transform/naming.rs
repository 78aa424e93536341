/// Convert an identifier to PascalCase.
///
/// Separators (`_`, `-`, `.`, whitespace) are dropped and the letter after each one is
/// upper-cased, as is the first letter and any letter following a digit. Existing
/// capitals are kept, so `fooBar` becomes `FooBar`.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    let mut prev_digit = false;

    for c in name.chars() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            upper_next = true;
            prev_digit = false;
            continue;
        }
        if upper_next || (prev_digit && c.is_alphabetic()) {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper_next = false;
        prev_digit = c.is_ascii_digit();
    }
    out
}
