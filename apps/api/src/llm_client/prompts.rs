// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts that produce numbers the user will act on.
pub const REALISM_INSTRUCTION: &str = "\
    Make all numbers realistic and defensible. Avoid inflated projections. \
    Amounts are whole US dollars, reach and segment sizes are whole people, \
    percentages are whole numbers between 0 and 100.";

/// Fills `{name}` placeholders in a single pass. Inserted values are never
/// rescanned, so user text containing `{...}` stays literal. Braces that do
/// not name a known placeholder (JSON examples) are copied as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
