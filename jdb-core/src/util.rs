use crate::PathStep;

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut first = true;
    for v in values {
        if !first {
            out.push_str(separator);
        }
        first = false;
        f(out, v);
    }
}

/// Appends `value` to `out` replacing every `search` with `replace`.
pub fn write_escaped(out: &mut String, value: &str, search: char, replace: &str) {
    let mut position = 0;
    for (i, c) in value.char_indices() {
        if c == search {
            out.push_str(&value[position..i]);
            out.push_str(replace);
            position = i + c.len_utf8();
        }
    }
    out.push_str(&value[position..]);
}

/// Appends the `$."key"[0]` form of a JSON path, ready to sit in a single quoted literal.
///
/// Double quotes in keys become `quote`, single quotes are doubled.
pub fn write_json_path(out: &mut String, steps: &[PathStep], quote: &str) {
    out.push('$');
    for step in steps {
        match step {
            PathStep::Key(key) => {
                out.push_str(".\"");
                for c in key.chars() {
                    match c {
                        '"' => out.push_str(quote),
                        '\'' => out.push_str("''"),
                        _ => out.push(c),
                    }
                }
                out.push('"');
            }
            PathStep::Index(index) => {
                out.push('[');
                crate::write_integer!(out, *index);
                out.push(']');
            }
        }
    }
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Byte offset of the character number `max`, or the length of `value` when it is shorter.
pub fn char_boundary(value: &str, max: usize) -> usize {
    value
        .char_indices()
        .nth(max)
        .map_or(value.len(), |(i, _)| i)
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::char_boundary(&$query, 497)].trim_end(),
            if $crate::char_boundary(&$query, 497) < $query.len() {
                "..."
            } else {
                ""
            },
        )
    };
}

#[macro_export]
macro_rules! write_integer {
    ($out:expr, $value:expr) => {{
        let mut buffer = ::itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
