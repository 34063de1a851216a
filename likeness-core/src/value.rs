use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::classify::classify_number;
use crate::identical::same_value_zero;
use crate::pattern::{Pattern, PatternError};
use crate::platform::HostObject;

// RUST CONCEPT: Primitives live inline, everything else lives behind a shared handle
// Objects are Rc<RefCell<...>> so a graph can point back at itself: an array
// may contain itself, two records may reference each other, and so on.
#[derive(Clone)]
pub enum Value {
    Undefined,        // Absent value
    Null,             // Explicit null (distinct from Undefined)
    Boolean(bool),
    Number(f64),      // IEEE-754 double, NaN and -0 included
    BigInt(BigInt),   // Arbitrary precision integer primitive
    String(Rc<str>),  // Compared by content, never by pointer
    Symbol(Symbol),   // Unique token, compared by pointer
    Object(Object),   // Any composite or reference-identity value
}

/// A unique token. Two symbols are the same only if they are the same
/// allocation, whatever their descriptions say.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(description: &str) -> Self {
        Symbol(description.into())
    }

    pub fn description(&self) -> &str {
        &self.0
    }

    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared handle to an object. Cloning the handle never copies the object.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

pub struct ObjectData {
    pub class: ObjectClass,
    pub properties: IndexMap<Rc<str>, Property>,
}

#[derive(Clone)]
pub struct Property {
    pub value: Value,
    pub enumerable: bool,
}

// RUST CONCEPT: The internal "class" of an object
// This is what the kind classifier dispatches on. Plain objects only have
// own properties; the other classes carry extra internal state.
pub enum ObjectClass {
    Plain,
    Array(Vec<Value>),
    Arguments(Vec<Value>),          // Variadic-parameter capture
    Boxed(Boxed),                   // Object wrapper around a primitive
    Date(DateTime<Utc>),
    Pattern(Pattern),
    Set(Vec<Value>),                // Insertion ordered, SameValueZero unique
    Map(Vec<(Value, Value)>),       // Insertion ordered, SameValueZero keys
    Function(Rc<str>),              // Only the name; functions compare by reference
    Host(Rc<dyn HostObject>),       // Opaque host-environment object
}

#[derive(Clone, Debug, PartialEq)]
pub enum Boxed {
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
}

impl ObjectClass {
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectClass::Plain => "Object",
            ObjectClass::Array(_) => "Array",
            ObjectClass::Arguments(_) => "Arguments",
            ObjectClass::Boxed(Boxed::Boolean(_)) => "Boolean",
            ObjectClass::Boxed(Boxed::Number(_)) => "Number",
            ObjectClass::Boxed(Boxed::String(_)) => "String",
            ObjectClass::Date(_) => "Date",
            ObjectClass::Pattern(_) => "RegExp",
            ObjectClass::Set(_) => "Set",
            ObjectClass::Map(_) => "Map",
            ObjectClass::Function(_) => "Function",
            ObjectClass::Host(host) => host.class_name(),
        }
    }
}

impl ObjectData {
    pub fn class_name(&self) -> &'static str {
        self.class.class_name()
    }

    /// Own enumerable properties, in insertion order.
    pub fn enumerable_properties(&self) -> impl Iterator<Item = (&Rc<str>, &Value)> {
        self.properties
            .iter()
            .filter(|(_, property)| property.enumerable)
            .map(|(key, property)| (key, &property.value))
    }
}

impl Object {
    pub fn new(class: ObjectClass) -> Self {
        Object(Rc::new(RefCell::new(ObjectData {
            class,
            properties: IndexMap::new(),
        })))
    }

    pub fn borrow(&self) -> Ref<'_, ObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Allocation address, stable for as long as any handle is alive.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn class_name(&self) -> &'static str {
        self.borrow().class_name()
    }

    /// Replace the internal class, keeping own properties.
    pub fn set_class(&self, class: ObjectClass) {
        self.borrow_mut().class = class;
    }

    /// Assign an own property. New properties are enumerable; existing ones
    /// keep their enumerability.
    pub fn set_property(&self, key: &str, value: Value) {
        let mut data = self.borrow_mut();
        match data.properties.get_mut(key) {
            Some(property) => property.value = value,
            None => {
                data.properties.insert(
                    key.into(),
                    Property {
                        value,
                        enumerable: true,
                    },
                );
            }
        }
    }

    /// Define a non-enumerable own property. Deep equality never looks at it.
    pub fn define_hidden(&self, key: &str, value: Value) {
        self.borrow_mut().properties.insert(
            key.into(),
            Property {
                value,
                enumerable: false,
            },
        );
    }

    pub fn get_property(&self, key: &str) -> Option<Value> {
        self.borrow()
            .properties
            .get(key)
            .map(|property| property.value.clone())
    }

    pub fn remove_property(&self, key: &str) -> Option<Value> {
        self.borrow_mut()
            .properties
            .shift_remove(key)
            .map(|property| property.value)
    }

    /// Append to an array or arguments object. Returns false for any other class.
    pub fn push(&self, value: Value) -> bool {
        match &mut self.borrow_mut().class {
            ObjectClass::Array(items) | ObjectClass::Arguments(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Overwrite an existing index of an array or arguments object.
    pub fn set_index(&self, index: usize, value: Value) -> bool {
        match &mut self.borrow_mut().class {
            ObjectClass::Array(items) | ObjectClass::Arguments(items) => match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<Value> {
        match &self.borrow().class {
            ObjectClass::Array(items) | ObjectClass::Arguments(items) => items.get(index).cloned(),
            _ => None,
        }
    }

    /// Add a set member. Returns true if it was not already present.
    pub fn set_add(&self, member: Value) -> bool {
        match &mut self.borrow_mut().class {
            ObjectClass::Set(members) => {
                let member = positive_zero(member);
                if members.iter().any(|existing| same_value_zero(existing, &member)) {
                    false
                } else {
                    members.push(member);
                    true
                }
            }
            _ => false,
        }
    }

    /// Insert or overwrite a map entry. Returns false if this is not a map.
    pub fn map_insert(&self, key: Value, value: Value) -> bool {
        match &mut self.borrow_mut().class {
            ObjectClass::Map(entries) => {
                let key = positive_zero(key);
                match entries.iter_mut().find(|(existing, _)| same_value_zero(existing, &key)) {
                    Some(entry) => entry.1 = value,
                    None => entries.push((key, value)),
                }
                true
            }
            _ => false,
        }
    }

    /// Element, member or entry count for collections.
    pub fn len(&self) -> Option<usize> {
        match &self.borrow().class {
            ObjectClass::Array(items) | ObjectClass::Arguments(items) | ObjectClass::Set(items) => {
                Some(items.len())
            }
            ObjectClass::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn host(&self) -> Option<Rc<dyn HostObject>> {
        match &self.borrow().class {
            ObjectClass::Host(host) => Some(Rc::clone(host)),
            _ => None,
        }
    }
}

// Set members and map keys store -0 as +0, as the host collections do
fn positive_zero(value: Value) -> Value {
    match value {
        Value::Number(n) if n == 0.0 => Value::Number(0.0),
        other => other,
    }
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn string(s: &str) -> Self {
        Value::String(s.into())
    }

    pub fn bigint(n: impl Into<BigInt>) -> Self {
        Value::BigInt(n.into())
    }

    pub fn symbol(description: &str) -> Self {
        Value::Symbol(Symbol::new(description))
    }

    pub fn object(class: ObjectClass) -> Self {
        Value::Object(Object::new(class))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::object(ObjectClass::Array(items))
    }

    pub fn arguments(items: Vec<Value>) -> Self {
        Value::object(ObjectClass::Arguments(items))
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let object = Object::new(ObjectClass::Plain);
        for (key, value) in fields {
            object.set_property(key.as_ref(), value);
        }
        Value::Object(object)
    }

    pub fn boxed_boolean(b: bool) -> Self {
        Value::object(ObjectClass::Boxed(Boxed::Boolean(b)))
    }

    pub fn boxed_number(n: f64) -> Self {
        Value::object(ObjectClass::Boxed(Boxed::Number(n)))
    }

    pub fn boxed_string(s: &str) -> Self {
        Value::object(ObjectClass::Boxed(Boxed::String(s.into())))
    }

    pub fn date(instant: DateTime<Utc>) -> Self {
        Value::object(ObjectClass::Date(instant))
    }

    /// None if the timestamp is outside chrono's representable range.
    pub fn date_from_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Value::date)
    }

    pub fn pattern(source: &str, flags: &str) -> Result<Self, PatternError> {
        Ok(Value::object(ObjectClass::Pattern(Pattern::new(source, flags)?)))
    }

    /// Build a set; later duplicates (by SameValueZero) are dropped.
    pub fn set(members: impl IntoIterator<Item = Value>) -> Self {
        let object = Object::new(ObjectClass::Set(Vec::new()));
        for member in members {
            object.set_add(member);
        }
        Value::Object(object)
    }

    /// Build a map; a repeated key overwrites the value but keeps its first position.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let object = Object::new(ObjectClass::Map(Vec::new()));
        for (key, value) in entries {
            object.map_insert(key, value);
        }
        Value::Object(object)
    }

    pub fn function(name: &str) -> Self {
        Value::object(ObjectClass::Function(name.into()))
    }

    pub fn host(host: Rc<dyn HostObject>) -> Self {
        Value::object(ObjectClass::Host(host))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<Rc<dyn HostObject>> {
        self.as_object().and_then(Object::host)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    // RUST CONCEPT: Get the type name of a value
    // Mirrors the host language's typeof: every object except functions is "object"
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Object(object) => match object.borrow().class {
                ObjectClass::Function(_) => "function",
                _ => "object",
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}

// Implement Debug manually: host objects are opaque and object graphs may be cyclic
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Number(n) => write!(f, "Number({:?})", n),
            Value::BigInt(n) => write!(f, "BigInt({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Symbol(sym) => write!(f, "Symbol({:?})", sym.description()),
            Value::Object(_) => write!(f, "Object({})", self),
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", Value::Object(self.clone()))
    }
}

// RUST CONCEPT: Implementing Display for Value types
// Diagnostic rendering in the reader's notation. An object reachable more
// than once is labelled at its first occurrence (`#1=`) and every later
// occurrence prints the label back (`#1#`), so cycles terminate, shared
// subgraphs print once, and the output reads back as the same graph.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels = Labels::default();
        labels.collect(self);
        write_value(f, self, &mut labels)
    }
}

#[derive(Default)]
struct Labels {
    seen: HashSet<usize>,
    shared: HashSet<usize>,
    assigned: HashMap<usize, usize>,
}

impl Labels {
    // Find every object reached more than once
    fn collect(&mut self, value: &Value) {
        let Value::Object(object) = value else {
            return;
        };
        if !self.seen.insert(object.addr()) {
            self.shared.insert(object.addr());
            return;
        }

        let data = object.borrow();
        match &data.class {
            ObjectClass::Array(items) | ObjectClass::Arguments(items) | ObjectClass::Set(items) => {
                items.iter().for_each(|item| self.collect(item));
            }
            ObjectClass::Map(entries) => {
                for (key, value) in entries {
                    self.collect(key);
                    self.collect(value);
                }
            }
            ObjectClass::Host(_) => return,
            _ => {}
        }
        for (_, value) in data.enumerable_properties() {
            self.collect(value);
        }
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value, labels: &mut Labels) -> fmt::Result {
    match value {
        Value::Undefined => write!(f, "undefined"),
        Value::Null => write!(f, "null"),
        Value::Boolean(b) => write!(f, "{}", b),
        Value::Number(n) => write_number(f, *n),
        Value::BigInt(n) => write!(f, "{}n", n),
        Value::String(s) => write!(f, "{:?}", s.as_ref()),
        Value::Symbol(sym) => write!(f, "#sym[{:?}]", sym.description()),
        Value::Object(object) => {
            let addr = object.addr();
            if let Some(label) = labels.assigned.get(&addr) {
                return write!(f, "#{}#", label);
            }
            if labels.shared.contains(&addr) {
                let label = labels.assigned.len() + 1;
                labels.assigned.insert(addr, label);
                write!(f, "#{}=", label)?;
            }
            write_object(f, object, labels)
        }
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let special = classify_number(n);
    if special.is_nan {
        write!(f, "NaN")
    } else if special.is_negative_zero {
        write!(f, "-0")
    } else if n == f64::INFINITY {
        write!(f, "Infinity")
    } else if n == f64::NEG_INFINITY {
        write!(f, "-Infinity")
    } else {
        write!(f, "{}", n)
    }
}

fn write_object(f: &mut fmt::Formatter<'_>, object: &Object, labels: &mut Labels) -> fmt::Result {
    let data = object.borrow();
    match &data.class {
        ObjectClass::Plain => {
            write!(f, "{{")?;
            write_entries(f, &data, labels)?;
            return write!(f, "}}");
        }
        ObjectClass::Array(items) => {
            write!(f, "[")?;
            write_items(f, items, labels)?;
        }
        ObjectClass::Arguments(items) => {
            write!(f, "#args[")?;
            write_items(f, items, labels)?;
        }
        ObjectClass::Set(members) => {
            write!(f, "#set[")?;
            write_items(f, members, labels)?;
        }
        ObjectClass::Map(entries) => {
            write!(f, "#map[")?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_value(f, key, labels)?;
                write!(f, " ")?;
                write_value(f, value, labels)?;
            }
        }
        ObjectClass::Boxed(boxed) => {
            write!(f, "#box[")?;
            match boxed {
                Boxed::Boolean(b) => write!(f, "{}", b)?,
                Boxed::Number(n) => write_number(f, *n)?,
                Boxed::String(s) => write!(f, "{:?}", s.as_ref())?,
            }
        }
        ObjectClass::Date(instant) => {
            // Milliseconds unless the instant carries a finer fraction
            let format = if instant.timestamp_subsec_nanos() % 1_000_000 == 0 {
                SecondsFormat::Millis
            } else {
                SecondsFormat::AutoSi
            };
            write!(f, "#date[{:?}", instant.to_rfc3339_opts(format, true))?;
        }
        ObjectClass::Pattern(pattern) => {
            write!(f, "#re[{:?} {:?}", pattern.source(), pattern.flags().to_string())?;
        }
        ObjectClass::Function(name) => {
            write!(f, "#fn[{}", name)?;
        }
        ObjectClass::Host(host) => {
            // Host objects render themselves and show no extra properties
            return host.fmt_notation(f);
        }
    }

    if data.enumerable_properties().next().is_some() {
        write!(f, " | {{")?;
        write_entries(f, &data, labels)?;
        write!(f, "}}")?;
    }
    write!(f, "]")
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value], labels: &mut Labels) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_value(f, item, labels)?;
    }
    Ok(())
}

fn write_entries(f: &mut fmt::Formatter<'_>, data: &ObjectData, labels: &mut Labels) -> fmt::Result {
    for (i, (key, value)) in data.enumerable_properties().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if is_bare_key(key) {
            write!(f, "{}: ", key)?;
        } else {
            write!(f, "{:?}: ", key.as_ref())?;
        }
        write_value(f, value, labels)?;
    }
    Ok(())
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::number(1.0).type_name(), "number");
        assert_eq!(Value::bigint(7).type_name(), "bigint");
        assert_eq!(Value::string("x").type_name(), "string");
        assert_eq!(Value::array(vec![]).type_name(), "object");
        assert_eq!(Value::function("f").type_name(), "function");
        assert_eq!(Value::boxed_string("x").type_name(), "object");
    }

    #[test]
    fn test_set_property_keeps_enumerability() {
        let object = Object::new(ObjectClass::Plain);
        object.define_hidden("secret", Value::from(1));
        object.set_property("secret", Value::from(2));
        let data = object.borrow();
        let property = data.properties.get("secret").unwrap();
        assert!(!property.enumerable);
        assert!(matches!(property.value, Value::Number(n) if n == 2.0));
    }

    #[test]
    fn test_set_deduplicates_with_same_value_zero() {
        let set = Value::set(vec![
            Value::number(0.0),
            Value::number(-0.0),
            Value::number(f64::NAN),
            Value::number(f64::NAN),
            Value::string("a"),
        ]);
        assert_eq!(set.as_object().unwrap().len(), Some(3));
    }

    #[test]
    fn test_map_overwrite_keeps_position() {
        let map = Value::map(vec![
            (Value::string("a"), Value::from(1)),
            (Value::string("b"), Value::from(2)),
            (Value::string("a"), Value::from(3)),
        ]);
        assert_eq!(map.to_string(), "#map[\"a\" 3, \"b\" 2]");
    }

    #[test]
    fn test_push_only_on_sequences() {
        let array = Value::array(vec![]);
        assert!(array.as_object().unwrap().push(Value::from(1)));
        let record = Value::record(Vec::<(&str, Value)>::new());
        assert!(!record.as_object().unwrap().push(Value::from(1)));
    }

    #[test]
    fn test_display_cycle() {
        let array = Value::array(vec![Value::from(1)]);
        let object = array.as_object().unwrap();
        object.push(array.clone());
        assert_eq!(array.to_string(), "#1=[1, #1#]");
    }

    #[test]
    fn test_display_shared_but_acyclic() {
        let shared = Value::array(vec![Value::from(1)]);
        let outer = Value::array(vec![shared.clone(), shared]);
        assert_eq!(outer.to_string(), "[#1=[1], #1#]");
    }

    #[test]
    fn test_display_shared_dag_stays_linear() {
        // Each level references the one below twice
        let mut value = Value::array(vec![Value::from(0)]);
        for _ in 0..40 {
            value = Value::array(vec![value.clone(), value]);
        }
        let text = value.to_string();
        assert!(text.len() < 1000, "rendered {} bytes", text.len());
        assert!(text.starts_with("[#1=[#2=["));
        assert!(text.contains("#40=[0], #40#"));
        assert!(text.ends_with(", #1#]"));
    }

    #[test]
    fn test_display_labels_in_first_occurrence_order() {
        let a = Value::array(vec![]);
        let b = Value::record([("a", a.clone())]);
        let outer = Value::array(vec![b.clone(), a, b]);
        assert_eq!(outer.to_string(), "[#1={a: #2=[]}, #2#, #1#]");
    }

    #[test]
    fn test_zero_keys_are_normalized() {
        let set = Value::set(vec![Value::number(-0.0)]);
        let member = match &set.as_object().unwrap().borrow().class {
            ObjectClass::Set(members) => members[0].clone(),
            _ => unreachable!(),
        };
        assert!(matches!(member, Value::Number(n) if n == 0.0 && n.is_sign_positive()));
        assert_eq!(set.to_string(), "#set[0]");

        let map = Value::map(vec![(Value::number(-0.0), Value::number(-0.0))]);
        // Keys only; values keep their sign
        assert_eq!(map.to_string(), "#map[0 -0]");
    }

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::number(-0.0).to_string(), "-0");
        assert_eq!(Value::number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::number(1.5).to_string(), "1.5");
        assert_eq!(Value::bigint(12).to_string(), "12n");
    }

    #[test]
    fn test_display_record_and_extras() {
        let record = Value::record([("name", Value::string("x")), ("two words", Value::from(2))]);
        assert_eq!(record.to_string(), "{name: \"x\", \"two words\": 2}");

        let array = Value::array(vec![Value::from(1)]);
        array.as_object().unwrap().set_property("tag", Value::Boolean(true));
        assert_eq!(array.to_string(), "[1 | {tag: true}]");
    }

    #[test]
    fn test_date_from_millis() {
        let date = Value::date_from_millis(0).unwrap();
        assert_eq!(date.to_string(), "#date[\"1970-01-01T00:00:00.000Z\"]");
    }

    #[test]
    fn test_date_display_keeps_sub_millisecond_fraction() {
        let instant = DateTime::<Utc>::from_timestamp(0, 900_000).unwrap();
        assert_eq!(
            Value::date(instant).to_string(),
            "#date[\"1970-01-01T00:00:00.000900Z\"]"
        );
    }
}
