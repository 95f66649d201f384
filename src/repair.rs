//! Best-effort structural repair of near-valid JSON text.
//!
//! LLMs are unreliable at emitting strictly valid JSON, especially when the
//! payload embeds markdown or code containing quotes and backslashes. This
//! module fixes the recurring failure modes seen in practice: markdown code
//! fences around the payload, prose before or after it, raw control
//! characters inside strings, trailing commas, and truncated output that
//! never closes its strings, objects or arrays.
//!
//! The contract is narrow on purpose: `string -> string`, never fails, and a
//! no-op on already-valid JSON, so the heuristics can be swapped without
//! touching any calling code.

/// Repair `raw` into the closest syntactically valid JSON text.
pub fn repair_json(raw: &str) -> String {
    let text = strip_code_fences(raw);
    let text = match text.find(['{', '[']) {
        Some(start) => &text[start..],
        // No JSON value in sight; nothing sensible to do.
        None => return text.trim().to_string(),
    };

    let mut out = String::with_capacity(text.len() + 8);
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut started = false;

    for c in text.chars() {
        if in_string {
            if escaped {
                out.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    out.push(c);
                    escaped = true;
                }
                '"' => {
                    out.push(c);
                    in_string = false;
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                _ => out.push(c),
            }
        } else {
            match c {
                '"' => {
                    in_string = true;
                    out.push(c);
                }
                '{' => {
                    stack.push('}');
                    started = true;
                    out.push(c);
                }
                '[' => {
                    stack.push(']');
                    started = true;
                    out.push(c);
                }
                '}' | ']' => {
                    trim_trailing_comma(&mut out);
                    if stack.last() == Some(&c) {
                        stack.pop();
                        out.push(c);
                    }
                    // Mismatched closer: drop it.
                }
                _ => out.push(c),
            }
        }
        // Top-level value complete; anything after it is trailing prose.
        if started && stack.is_empty() && !in_string {
            break;
        }
    }

    if escaped {
        // Dangling backslash from a truncated escape sequence.
        out.push('\\');
    }
    if in_string {
        out.push('"');
    }
    trim_trailing_comma(&mut out);
    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}

/// If the text wraps its payload in a markdown code fence, return the fenced
/// content; otherwise return the input unchanged.
fn strip_code_fences(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_fence = &text[open + 3..];
    // Skip the optional language tag up to the end of the fence line.
    let body = match after_fence.find('\n') {
        Some(nl) => &after_fence[nl + 1..],
        None => after_fence,
    };
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Drop a trailing comma (and surrounding whitespace) from the buffer.
fn trim_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end();
    if let Some(stripped) = trimmed.strip_suffix(',') {
        let len = stripped.len();
        out.truncate(len);
    } else {
        let len = trimmed.len();
        out.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).expect("repaired text should parse")
    }

    #[test]
    fn valid_json_is_untouched() {
        let input = r#"{"tasks": [{"task_name": "a", "priority": "Must"}]}"#;
        assert_eq!(repair_json(input), input);
    }

    #[test]
    fn repair_is_idempotent_on_valid_input() {
        let input = r#"{"edges": [{"parent": 0, "child": 1}]}"#;
        let once = repair_json(input);
        let twice = repair_json(&once);
        assert_eq!(parse(&once), parse(input));
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_markdown_fences() {
        let input = "```json\n{\"deploy\": \"Use Vercel\"}\n```";
        assert_eq!(parse(&repair_json(input)), parse("{\"deploy\": \"Use Vercel\"}"));
    }

    #[test]
    fn strips_leading_and_trailing_prose() {
        let input = "Here is the JSON you asked for:\n{\"summary\": \"ok\"} Hope this helps!";
        assert_eq!(parse(&repair_json(input)), parse("{\"summary\": \"ok\"}"));
    }

    #[test]
    fn removes_trailing_commas() {
        let input = r#"{"tasks": [{"task_name": "a",}, ],}"#;
        let repaired = repair_json(input);
        let v = parse(&repaired);
        assert_eq!(v["tasks"][0]["task_name"], "a");
    }

    #[test]
    fn closes_truncated_output() {
        let input = r#"{"tasks": [{"task_name": "a", "detail": "run npm ins"#;
        let v = parse(&repair_json(input));
        assert_eq!(v["tasks"][0]["detail"], "run npm ins");
    }

    #[test]
    fn escapes_raw_newlines_inside_strings() {
        let input = "{\"detail\": \"line one\nline two\"}";
        let v = parse(&repair_json(input));
        assert_eq!(v["detail"], "line one\nline two");
    }

    #[test]
    fn drops_mismatched_closer() {
        let input = r#"{"a": [1, 2]]}"#;
        let v = parse(&repair_json(input));
        assert_eq!(v["a"][1], 2);
    }

    #[test]
    fn no_json_at_all_passes_through() {
        assert_eq!(repair_json("no structured output here"), "no structured output here");
    }
}
