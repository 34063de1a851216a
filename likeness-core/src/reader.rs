// This module converts tokens (from the tokenizer) into Values
//
// NOTATION:
// - Primitives: undefined null true false 1.5 -0 NaN Infinity 12n "text"
// - Arrays: [1 2 3]          Records: {a: 1, "two words": 2}
// - Tagged forms: #args[..] #set[..] #map[k v ..] #date["2020-01-01T00:00:00Z"]
//   #re["a+" "gi"] #box[1] #fn[name] #sym["description"]
// - Extra own properties go after a pipe: [1 2 | {tag: "x"}]
// - Labels build shared and cyclic graphs: #1={self: #1#}
//
// Labels are scoped to one call of `read`, so several top-level values may
// share objects. That is how the REPL compares a value with itself.

use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use thiserror::Error;
use tracing::debug;

use crate::pattern::{Pattern, PatternError};
use crate::tokenizer::{SourcePos, Token, TokenKind, TokenizeError, tokenize};
use crate::value::{Boxed, Object, ObjectClass, Symbol, Value};

#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("expected {expected}, found `{found}` at {pos}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        pos: SourcePos,
    },
    #[error("invalid number `{text}` at {pos}")]
    InvalidNumber { text: String, pos: SourcePos },
    #[error("unknown tag `#{tag}[` at {pos}")]
    UnknownTag { tag: String, pos: SourcePos },
    #[error("label #{label}# is not defined at {pos}")]
    UndefinedLabel { label: u32, pos: SourcePos },
    #[error("label #{label}= is defined twice, again at {pos}")]
    DuplicateLabel { label: u32, pos: SourcePos },
    #[error("invalid date `{text}` at {pos}")]
    InvalidDate { text: String, pos: SourcePos },
    #[error("bad arguments to #{tag}[ at {pos}: {message}")]
    BadArguments {
        tag: &'static str,
        message: &'static str,
        pos: SourcePos,
    },
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error("expected exactly one value, found {0}")]
    ExpectedOneValue(usize),
}

type Labels = HashMap<u32, Value>;

/// Read every top-level value in `input`.
pub fn read(input: &str) -> Result<Vec<Value>, ReadError> {
    let tokens = tokenize(input)?;
    let mut labels = Labels::new();
    let mut index = 0;
    let mut results = Vec::new();

    while index < tokens.len() {
        let value = read_value(&tokens, &mut index, &mut labels)?;
        results.push(value);
    }

    Ok(results)
}

/// Read an input that must hold exactly one value.
pub fn read_one(input: &str) -> Result<Value, ReadError> {
    let mut values = read(input)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        n => Err(ReadError::ExpectedOneValue(n)),
    }
}

fn read_value(tokens: &[Token], index: &mut usize, labels: &mut Labels) -> Result<Value, ReadError> {
    let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;

    match &token.kind {
        TokenKind::LabelDef(label) => {
            *index += 1;
            if labels.contains_key(label) {
                return Err(ReadError::DuplicateLabel {
                    label: *label,
                    pos: token.pos.clone(),
                });
            }
            read_datum(tokens, index, labels, Some(*label))
        }
        TokenKind::LabelRef(label) => {
            *index += 1;
            labels
                .get(label)
                .cloned()
                .ok_or_else(|| ReadError::UndefinedLabel {
                    label: *label,
                    pos: token.pos.clone(),
                })
        }
        _ => read_datum(tokens, index, labels, None),
    }
}

fn define_label(labels: &mut Labels, label: Option<u32>, value: &Value) {
    if let Some(label) = label {
        debug!(label, kind = value.type_name(), "defined label");
        labels.insert(label, value.clone());
    }
}

fn new_shell(labels: &mut Labels, label: Option<u32>) -> Object {
    let shell = Object::new(ObjectClass::Plain);
    define_label(labels, label, &Value::Object(shell.clone()));
    shell
}

fn read_datum(
    tokens: &[Token],
    index: &mut usize,
    labels: &mut Labels,
    label: Option<u32>,
) -> Result<Value, ReadError> {
    let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;

    // RUST CONCEPT: Shells for composite values
    // The object is allocated and labelled before its contents are read, so
    // the contents may refer back to it. Its real class is set at the end.
    let shell = match &token.kind {
        TokenKind::LeftBracket => {
            let shell = new_shell(labels, label);
            read_array(tokens, index, labels, &shell)?;
            shell
        }
        TokenKind::LeftBrace => {
            let shell = new_shell(labels, label);
            read_properties(tokens, index, labels, &shell)?;
            shell
        }
        TokenKind::TaggedBracket(tag) if tag != "sym" => {
            let shell = new_shell(labels, label);
            read_tagged(tokens, index, labels, &shell, tag, &token.pos)?;
            shell
        }
        _ => {
            let value = read_primitive(tokens, index)?;
            define_label(labels, label, &value);
            return Ok(value);
        }
    };

    Ok(Value::Object(shell))
}

fn unexpected(token: &Token, expected: &'static str) -> ReadError {
    ReadError::UnexpectedToken {
        expected,
        found: token.kind.to_string(),
        pos: token.pos.clone(),
    }
}

fn read_primitive(tokens: &[Token], index: &mut usize) -> Result<Value, ReadError> {
    let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
    let value = match &token.kind {
        TokenKind::Number(n) => Value::Number(*n),
        TokenKind::BigInt(digits) => match digits.parse::<BigInt>() {
            Ok(n) => Value::BigInt(n),
            Err(_) => {
                return Err(ReadError::InvalidNumber {
                    text: format!("{}n", digits),
                    pos: token.pos.clone(),
                });
            }
        },
        TokenKind::String(s) => Value::string(s),
        TokenKind::Boolean(b) => Value::Boolean(*b),
        TokenKind::Null => Value::Null,
        TokenKind::Undefined => Value::Undefined,
        TokenKind::TaggedBracket(tag) if tag == "sym" => {
            *index += 1;
            let description = expect_string(tokens, index)?;
            expect_close(tokens, index)?;
            return Ok(Value::Symbol(Symbol::new(&description)));
        }
        _ => return Err(unexpected(token, "a value")),
    };
    *index += 1;
    Ok(value)
}

fn expect_string(tokens: &[Token], index: &mut usize) -> Result<String, ReadError> {
    let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
    match &token.kind {
        TokenKind::String(s) => {
            *index += 1;
            Ok(s.clone())
        }
        _ => Err(unexpected(token, "a string")),
    }
}

fn expect_close(tokens: &[Token], index: &mut usize) -> Result<(), ReadError> {
    let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
    match token.kind {
        TokenKind::RightBracket => {
            *index += 1;
            Ok(())
        }
        _ => Err(unexpected(token, "`]`")),
    }
}

// Items up to the closing bracket. A `| {..}` tail attaches its properties
// to `shell`.
fn read_items(
    tokens: &[Token],
    index: &mut usize,
    labels: &mut Labels,
    shell: &Object,
) -> Result<Vec<Value>, ReadError> {
    let mut items = Vec::new();

    loop {
        let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
        match token.kind {
            TokenKind::RightBracket => {
                *index += 1;
                return Ok(items);
            }
            TokenKind::Pipe => {
                *index += 1;
                read_properties(tokens, index, labels, shell)?;
                expect_close(tokens, index)?;
                return Ok(items);
            }
            _ => items.push(read_value(tokens, index, labels)?),
        }
    }
}

fn read_array(
    tokens: &[Token],
    index: &mut usize,
    labels: &mut Labels,
    shell: &Object,
) -> Result<(), ReadError> {
    *index += 1; // Skip the opening bracket
    let items = read_items(tokens, index, labels, shell)?;
    shell.set_class(ObjectClass::Array(items));
    Ok(())
}

// `{key: value ...}` onto `shell`; a repeated key keeps the last value
fn read_properties(
    tokens: &[Token],
    index: &mut usize,
    labels: &mut Labels,
    shell: &Object,
) -> Result<(), ReadError> {
    let open = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
    if open.kind != TokenKind::LeftBrace {
        return Err(unexpected(open, "`{`"));
    }
    *index += 1;

    loop {
        let token = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
        let key = match &token.kind {
            TokenKind::RightBrace => {
                *index += 1;
                return Ok(());
            }
            TokenKind::Atom(key) | TokenKind::String(key) => key.clone(),
            // Keywords and numbers are fine as keys too: {null: 1, 0: "a"}
            TokenKind::Number(_) | TokenKind::Boolean(_) | TokenKind::Null | TokenKind::Undefined => {
                token.kind.to_string()
            }
            _ => return Err(unexpected(token, "a property key")),
        };
        *index += 1;

        let colon = tokens.get(*index).ok_or(ReadError::UnexpectedEndOfInput)?;
        if colon.kind != TokenKind::Colon {
            return Err(unexpected(colon, "`:`"));
        }
        *index += 1;

        let value = read_value(tokens, index, labels)?;
        shell.set_property(&key, value);
    }
}

fn read_tagged(
    tokens: &[Token],
    index: &mut usize,
    labels: &mut Labels,
    shell: &Object,
    tag: &str,
    pos: &SourcePos,
) -> Result<(), ReadError> {
    *index += 1; // Skip the tagged bracket

    let bad = |tag: &'static str, message: &'static str| ReadError::BadArguments {
        tag,
        message,
        pos: pos.clone(),
    };

    let class = match tag {
        "args" => ObjectClass::Arguments(read_items(tokens, index, labels, shell)?),
        "set" => {
            let members = read_items(tokens, index, labels, shell)?;
            shell.set_class(ObjectClass::Set(Vec::new()));
            for member in members {
                shell.set_add(member);
            }
            return Ok(());
        }
        "map" => {
            let items = read_items(tokens, index, labels, shell)?;
            if items.len() % 2 != 0 {
                return Err(bad("map", "expected key and value pairs"));
            }
            shell.set_class(ObjectClass::Map(Vec::new()));
            let mut items = items.into_iter();
            while let (Some(key), Some(value)) = (items.next(), items.next()) {
                shell.map_insert(key, value);
            }
            return Ok(());
        }
        "date" => {
            let items = read_items(tokens, index, labels, shell)?;
            ObjectClass::Date(read_date(&items).map_err(|err| match err {
                DateArgs::Count => bad("date", "expected one timestamp"),
                DateArgs::Invalid(text) => ReadError::InvalidDate {
                    text,
                    pos: pos.clone(),
                },
            })?)
        }
        "re" => {
            let items = read_items(tokens, index, labels, shell)?;
            let pattern = match items.as_slice() {
                [Value::String(source)] => Pattern::new(source, "")?,
                [Value::String(source), Value::String(flags)] => Pattern::new(source, flags)?,
                _ => return Err(bad("re", "expected a source string and optional flags")),
            };
            ObjectClass::Pattern(pattern)
        }
        "box" => {
            let items = read_items(tokens, index, labels, shell)?;
            let boxed = match items.as_slice() {
                [Value::Boolean(b)] => Boxed::Boolean(*b),
                [Value::Number(n)] => Boxed::Number(*n),
                [Value::String(s)] => Boxed::String(Rc::clone(s)),
                _ => return Err(bad("box", "expected one boolean, number or string")),
            };
            ObjectClass::Boxed(boxed)
        }
        "fn" => {
            let name = match tokens.get(*index).map(|token| &token.kind) {
                Some(TokenKind::Atom(name)) | Some(TokenKind::String(name)) => {
                    *index += 1;
                    name.clone()
                }
                Some(TokenKind::RightBracket) | Some(TokenKind::Pipe) => "anonymous".to_string(),
                Some(_) => return Err(bad("fn", "expected a name")),
                None => return Err(ReadError::UnexpectedEndOfInput),
            };
            if !read_items(tokens, index, labels, shell)?.is_empty() {
                return Err(bad("fn", "expected a name"));
            }
            ObjectClass::Function(name.into())
        }
        #[cfg(feature = "document")]
        "element" => {
            let name = expect_string(tokens, index)?;
            let node = Rc::new(crate::document::Node::element(&name));
            shell.set_class(ObjectClass::Host(node.clone()));
            for child in read_items(tokens, index, labels, shell)? {
                node.append_child(child);
            }
            return Ok(());
        }
        #[cfg(feature = "document")]
        "text" => {
            let data = expect_string(tokens, index)?;
            expect_close(tokens, index)?;
            ObjectClass::Host(Rc::new(crate::document::Node::text(&data)))
        }
        _ => {
            return Err(ReadError::UnknownTag {
                tag: tag.to_string(),
                pos: pos.clone(),
            });
        }
    };

    shell.set_class(class);
    Ok(())
}

enum DateArgs {
    Count,
    Invalid(String),
}

// An RFC 3339 string or a whole number of milliseconds since the epoch
fn read_date(items: &[Value]) -> Result<DateTime<Utc>, DateArgs> {
    match items {
        [Value::String(text)] => DateTime::parse_from_rfc3339(text)
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|_| DateArgs::Invalid(text.to_string())),
        [Value::Number(millis)] => {
            if millis.is_finite() && millis.fract() == 0.0 {
                DateTime::<Utc>::from_timestamp_millis(*millis as i64)
                    .ok_or_else(|| DateArgs::Invalid(millis.to_string()))
            } else {
                Err(DateArgs::Invalid(millis.to_string()))
            }
        }
        _ => Err(DateArgs::Count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectData;

    fn class_of(value: &Value) -> &'static str {
        value.as_object().unwrap().class_name()
    }

    fn with_data<T>(value: &Value, f: impl FnOnce(&ObjectData) -> T) -> T {
        f(&value.as_object().unwrap().borrow())
    }

    #[test]
    fn test_read_primitives() {
        let values = read("undefined null true 1.5 -0 NaN 12n \"hi\"").unwrap();
        assert_eq!(values.len(), 8);
        assert!(matches!(values[0], Value::Undefined));
        assert!(matches!(values[1], Value::Null));
        assert!(matches!(values[2], Value::Boolean(true)));
        assert!(matches!(values[3], Value::Number(n) if n == 1.5));
        assert!(matches!(values[4], Value::Number(n) if n == 0.0 && n.is_sign_negative()));
        assert!(matches!(values[5], Value::Number(n) if n.is_nan()));
        assert!(matches!(&values[6], Value::BigInt(n) if *n == BigInt::from(12)));
        assert!(matches!(&values[7], Value::String(s) if s.as_ref() == "hi"));
    }

    #[test]
    fn test_read_array_and_record() {
        let array = read_one("[1, 2, [3]]").unwrap();
        assert_eq!(class_of(&array), "Array");
        assert_eq!(array.as_object().unwrap().len(), Some(3));

        let record = read_one("{a: 1, \"b c\": [true]}").unwrap();
        assert_eq!(class_of(&record), "Object");
        assert!(record.as_object().unwrap().get_property("b c").is_some());
        assert_eq!(record.to_string(), "{a: 1, \"b c\": [true]}");
    }

    #[test]
    fn test_extra_properties() {
        let array = read_one("[1 2 | {tag: \"x\"}]").unwrap();
        assert_eq!(array.to_string(), "[1, 2 | {tag: \"x\"}]");
    }

    #[test]
    fn test_tagged_forms() {
        assert_eq!(class_of(&read_one("#args[1 2]").unwrap()), "Arguments");
        assert_eq!(class_of(&read_one("#set[1 1 2]").unwrap()), "Set");
        assert_eq!(read_one("#set[1 1 2]").unwrap().as_object().unwrap().len(), Some(2));
        assert_eq!(class_of(&read_one("#map[\"a\" 1 \"b\" 2]").unwrap()), "Map");
        assert_eq!(class_of(&read_one("#box[\"s\"]").unwrap()), "String");
        assert_eq!(class_of(&read_one("#fn[handler]").unwrap()), "Function");
        assert_eq!(class_of(&read_one("#re[\"a+\" \"g\"]").unwrap()), "RegExp");
        assert!(matches!(read_one("#sym[\"id\"]").unwrap(), Value::Symbol(_)));
    }

    #[test]
    fn test_dates() {
        let from_text = read_one("#date[\"1970-01-01T00:00:01Z\"]").unwrap();
        let from_millis = read_one("#date[1000]").unwrap();
        let millis = |value: &Value| {
            with_data(value, |data| match &data.class {
                ObjectClass::Date(instant) => instant.timestamp_millis(),
                _ => panic!("not a date"),
            })
        };
        assert_eq!(millis(&from_text), 1000);
        assert_eq!(millis(&from_millis), 1000);

        assert!(matches!(read_one("#date[\"yesterday\"]"), Err(ReadError::InvalidDate { .. })));
        assert!(matches!(read_one("#date[1.5]"), Err(ReadError::InvalidDate { .. })));
        assert!(matches!(read_one("#date[]"), Err(ReadError::BadArguments { tag: "date", .. })));
    }

    #[test]
    fn test_date_keeps_sub_millisecond_fraction() {
        let text = "#date[\"1970-01-01T00:00:00.000900Z\"]";
        let value = read_one(text).unwrap();
        let nanos = with_data(&value, |data| match &data.class {
            ObjectClass::Date(instant) => instant.timestamp_subsec_nanos(),
            _ => panic!("not a date"),
        });
        assert_eq!(nanos, 900_000);
        assert_eq!(value.to_string(), text);
    }

    #[test]
    fn test_self_reference() {
        let value = read_one("#1={self: #1#}").unwrap();
        let object = value.as_object().unwrap();
        let inner = object.get_property("self").unwrap();
        assert!(inner.as_object().unwrap().ptr_eq(object));
        assert_eq!(value.to_string(), "#1={self: #1#}");
    }

    #[test]
    fn test_display_reads_back_as_the_same_graph() {
        let value = read_one("[#1=[1] #1# #2={next: #2#}]").unwrap();
        let text = value.to_string();
        assert_eq!(text, "[#1=[1], #1#, #2={next: #2#}]");

        let again = read_one(&text).unwrap();
        let first = again.as_object().unwrap().get_index(0).unwrap();
        let second = again.as_object().unwrap().get_index(1).unwrap();
        assert!(first.as_object().unwrap().ptr_eq(second.as_object().unwrap()));
        assert_eq!(again.to_string(), text);
    }

    #[test]
    fn test_cyclic_set() {
        let value = read_one("#7=#set[1 #7#]").unwrap();
        assert_eq!(value.as_object().unwrap().len(), Some(2));
    }

    #[test]
    fn test_labels_span_top_level_values() {
        let values = read("#1=[1] #1#").unwrap();
        let (a, b) = (values[0].as_object().unwrap(), values[1].as_object().unwrap());
        assert!(a.ptr_eq(b));
    }

    #[test]
    fn test_label_errors() {
        assert!(matches!(read("#2#"), Err(ReadError::UndefinedLabel { label: 2, .. })));
        assert!(matches!(
            read("#1=[] #1=[]"),
            Err(ReadError::DuplicateLabel { label: 1, .. })
        ));
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(read("[1 2"), Err(ReadError::UnexpectedEndOfInput)));
        assert!(matches!(read("]"), Err(ReadError::UnexpectedToken { .. })));
        assert!(matches!(read("hello"), Err(ReadError::UnexpectedToken { .. })));
        assert!(matches!(read("#nope[]"), Err(ReadError::UnknownTag { .. })));
        assert!(matches!(read("#map[1]"), Err(ReadError::BadArguments { tag: "map", .. })));
        assert!(matches!(read("#re[\"a\" \"q\"]"), Err(ReadError::Pattern(_))));
        assert!(matches!(read("{a 1}"), Err(ReadError::UnexpectedToken { .. })));
        assert!(matches!(read("\"open"), Err(ReadError::Tokenize(_))));
        assert!(matches!(read_one("1 2"), Err(ReadError::ExpectedOneValue(2))));
        assert!(matches!(read_one(""), Err(ReadError::ExpectedOneValue(0))));
    }

    #[test]
    fn test_patterns_the_regex_crate_rejects() {
        let value = read_one("#re[\"(a)\\\\1\"]").unwrap();
        let source = with_data(&value, |data| match &data.class {
            ObjectClass::Pattern(pattern) => pattern.source().to_string(),
            _ => panic!("not a pattern"),
        });
        assert_eq!(source, "(a)\\1");
        assert!(read_one("#re[\"(\"]").is_ok());
    }

    #[test]
    fn test_error_message_has_position() {
        let err = read("[1\n  hello]").unwrap_err();
        assert_eq!(err.to_string(), "expected a value, found `hello` at line 2, column 3");
    }

    #[cfg(feature = "document")]
    #[test]
    fn test_document_nodes() {
        let element = read_one("#element[\"ul\" #text[\"a\"] #text[\"b\"]]").unwrap();
        let host = element.as_host().unwrap();
        let node = host.as_any().downcast_ref::<crate::document::Node>().unwrap();
        assert!(node.is_element());
        assert_eq!(node.children().len(), 2);
        assert_eq!(class_of(&read_one("#text[\"x\"]").unwrap()), "Text");
    }
}
