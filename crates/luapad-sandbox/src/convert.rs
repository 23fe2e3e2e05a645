//! Marshaling Lua values across the sandbox boundary.

use std::ffi::c_void;

use luapad_core::Value;

/// Recursion cap for nested tables.
const MAX_DEPTH: usize = 64;

/// Marshal one Lua value into the boundary representation.
///
/// Cycle-safe: a table reached through itself marshals as
/// [`Value::Circular`] at the point of re-entry. Sibling references to the
/// same table are not cycles and marshal normally.
#[must_use]
pub fn marshal(value: &mlua::Value) -> Value {
    let mut path = Vec::new();
    convert(value, &mut path)
}

fn convert(value: &mlua::Value, path: &mut Vec<*const c_void>) -> Value {
    match value {
        mlua::Value::Nil => Value::Nil,
        mlua::Value::Boolean(b) => Value::Bool(*b),
        mlua::Value::Integer(i) => Value::Int(*i),
        mlua::Value::Number(n) => Value::Float(*n),
        mlua::Value::String(s) => Value::Str(
            s.to_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|_| "<invalid utf8>".to_string()),
        ),
        mlua::Value::Table(table) => convert_table(table, path),
        mlua::Value::Function(_) => Value::Opaque("function".to_string()),
        mlua::Value::Thread(_) => Value::Opaque("thread".to_string()),
        mlua::Value::UserData(_) | mlua::Value::LightUserData(_) => {
            Value::Opaque("userdata".to_string())
        }
        mlua::Value::Error(e) => Value::Str(e.to_string()),
        other => Value::Opaque(other.type_name().to_string()),
    }
}

fn convert_table(table: &mlua::Table, path: &mut Vec<*const c_void>) -> Value {
    let ptr = table.to_pointer();
    if path.contains(&ptr) {
        return Value::Circular;
    }
    if path.len() >= MAX_DEPTH {
        return Value::Opaque("table".to_string());
    }
    path.push(ptr);

    let mut pairs = Vec::new();
    for pair in table.clone().pairs::<mlua::Value, mlua::Value>() {
        // Iteration failures (misbehaving metamethods) skip the pair
        // rather than aborting the whole marshal.
        if let Ok(p) = pair {
            pairs.push(p);
        }
    }

    let len = table.raw_len();
    let out = if is_sequence(&pairs, len) {
        let items = (1..=len)
            .map(|i| {
                let item = table.raw_get::<mlua::Value>(i).unwrap_or(mlua::Value::Nil);
                convert(&item, path)
            })
            .collect();
        Value::Seq(items)
    } else {
        let mut entries: Vec<(String, Value)> = pairs
            .iter()
            .map(|(k, v)| (key_string(k), convert(v, path)))
            .collect();
        // Lua exposes no insertion order; sort keys so previews are
        // deterministic.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    };

    path.pop();
    out
}

/// A table is a sequence when its keys are exactly `1..=len`, len >= 1.
fn is_sequence(pairs: &[(mlua::Value, mlua::Value)], len: usize) -> bool {
    len >= 1
        && pairs.len() == len
        && pairs.iter().all(|(k, _)| {
            matches!(k, mlua::Value::Integer(i) if *i >= 1 && (*i as usize) <= len)
        })
}

fn key_string(key: &mlua::Value) -> String {
    match key {
        mlua::Value::String(s) => s
            .to_str()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| "<invalid utf8>".to_string()),
        mlua::Value::Integer(i) => i.to_string(),
        mlua::Value::Number(n) => n.to_string(),
        mlua::Value::Boolean(b) => b.to_string(),
        other => format!("<{}>", other.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    fn eval(src: &str) -> Value {
        let lua = Lua::new();
        let value = lua.load(src).eval::<mlua::Value>().unwrap();
        marshal(&value)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(eval("nil"), Value::Nil);
        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("42"), Value::Int(42));
        assert_eq!(eval("1.5"), Value::Float(1.5));
        assert_eq!(eval("'hello'"), Value::str("hello"));
    }

    #[test]
    fn test_sequence() {
        assert_eq!(
            eval("{1, 2, 3}"),
            Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_map_keys_sorted() {
        assert_eq!(
            eval("{b = 2, a = 1}"),
            Value::Map(vec![
                ("a".to_string(), Value::Int(1)),
                ("b".to_string(), Value::Int(2)),
            ])
        );
    }

    #[test]
    fn test_mixed_table_is_map() {
        let value = eval("{1, 2, x = 3}");
        match value {
            Value::Map(entries) => {
                assert_eq!(entries.len(), 3);
                assert!(entries.iter().any(|(k, _)| k == "x"));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_map() {
        assert_eq!(eval("{}"), Value::Map(vec![]));
    }

    #[test]
    fn test_nested_structures() {
        assert_eq!(
            eval("{inner = {1, 'two'}}"),
            Value::Map(vec![(
                "inner".to_string(),
                Value::Seq(vec![Value::Int(1), Value::str("two")])
            )])
        );
    }

    #[test]
    fn test_function_is_opaque() {
        assert_eq!(eval("function() end"), Value::Opaque("function".to_string()));
    }

    #[test]
    fn test_cycle_becomes_placeholder() {
        let value = eval("local t = {} t.me = t return t");
        assert_eq!(value, Value::Map(vec![("me".to_string(), Value::Circular)]));
    }

    #[test]
    fn test_shared_table_is_not_a_cycle() {
        let value = eval("local s = {1} return {s, s}");
        let leaf = Value::Seq(vec![Value::Int(1)]);
        assert_eq!(value, Value::Seq(vec![leaf.clone(), leaf]));
    }

    #[test]
    fn test_integer_keyed_map() {
        // Keys 1 and 3 with a hole: not a sequence.
        let value = eval("return {[1] = 'a', [3] = 'c'}");
        match value {
            Value::Map(entries) => {
                assert!(entries.iter().any(|(k, _)| k == "3"));
            }
            Value::Seq(_) => panic!("table with holes must not marshal as a sequence"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
