//! JavaScript emission strategies
//!
//! Generated code talks to the `ByteBuffer` runtime shipped alongside it.
//! Scalars map one-to-one onto buffer methods. Sequences and maps are written
//! as a length followed by their elements (a null container is written as
//! length 0) and read back into a fresh container. Nested messages go through
//! `writePacket`/`readPacket` so the presence flag of the inner message is
//! handled by its own generated code.
//!
//! | Kind | Write | Read |
//! |------|-------|------|
//! | `bool` | `writeBoolean` | `readBoolean` |
//! | `int` | `writeInt` | `readInt` |
//! | `list<T>` | length + elements | `[]` + `push` |
//! | `set<T>` | size + elements | `new Set()` + `add` |
//! | `map<K, V>` | size + key/value pairs | `new Map()` + `set` |
//! | `message<ID>` | `writePacket(v, ID)` | `readPacket(ID)` |

use crate::dispatch::{Declaration, DispatchTable, Emission, EmissionStrategy, ReadFragment};
use crate::fragment::CodeFragment;
use protogen_core::{GenerateError, GenerateResult, KindTag, ValueKind};

/// Dispatch table covering every value kind.
pub fn dispatch_table() -> DispatchTable {
    DispatchTable::empty()
        .with_strategy(KindTag::Bool, Scalar::new("writeBoolean", "readBoolean"))
        .with_strategy(KindTag::Byte, Scalar::new("writeByte", "readByte"))
        .with_strategy(KindTag::Short, Scalar::new("writeShort", "readShort"))
        .with_strategy(KindTag::Int, Scalar::new("writeInt", "readInt"))
        .with_strategy(KindTag::Long, Scalar::new("writeLong", "readLong"))
        .with_strategy(KindTag::Float, Scalar::new("writeFloat", "readFloat"))
        .with_strategy(KindTag::Double, Scalar::new("writeDouble", "readDouble"))
        .with_strategy(KindTag::Char, Scalar::new("writeChar", "readChar"))
        .with_strategy(KindTag::String, Scalar::new("writeString", "readString"))
        .with_strategy(KindTag::Array, Sequence::ARRAY)
        .with_strategy(KindTag::List, Sequence::LIST)
        .with_strategy(KindTag::Set, Sequence::SET)
        .with_strategy(KindTag::Map, MapEntries)
        .with_strategy(KindTag::NestedMessage, NestedMessage)
}

/// A kind reached a strategy registered for a different shape.
fn mismatched(kind: &ValueKind, strategy: &str) -> GenerateError {
    GenerateError::Config(format!("{strategy} strategy cannot emit value kind {kind}"))
}

// ============================================================================
// Scalars
// ============================================================================

/// Single buffer call in each direction.
#[derive(Debug, Clone, Copy)]
pub struct Scalar {
    writer: &'static str,
    reader: &'static str,
}

impl Scalar {
    pub const fn new(writer: &'static str, reader: &'static str) -> Self {
        Self { writer, reader }
    }
}

impl EmissionStrategy for Scalar {
    fn emit_write(
        &self,
        _emission: &mut Emission<'_>,
        source: &str,
        depth: usize,
        _kind: &ValueKind,
    ) -> GenerateResult<CodeFragment> {
        let mut code = CodeFragment::at(depth);
        code.line(format!("buffer.{}({source});", self.writer));
        Ok(code)
    }

    fn emit_read(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        _kind: &ValueKind,
    ) -> GenerateResult<ReadFragment> {
        let result = emission.fresh("result");
        let mut statements = CodeFragment::at(depth);
        statements.line(format!("const {result} = buffer.{}();", self.reader));
        Ok(ReadFragment {
            statements,
            expr: result,
        })
    }
}

// ============================================================================
// Sequences
// ============================================================================

/// Arrays, lists and sets: a length prefix followed by the elements.
#[derive(Debug, Clone, Copy)]
pub struct Sequence {
    name: &'static str,
    length: &'static str,
    empty: &'static str,
    insert: &'static str,
}

impl Sequence {
    pub const ARRAY: Sequence = Sequence {
        name: "array",
        length: "length",
        empty: "[]",
        insert: "push",
    };

    pub const LIST: Sequence = Sequence {
        name: "list",
        length: "length",
        empty: "[]",
        insert: "push",
    };

    pub const SET: Sequence = Sequence {
        name: "set",
        length: "size",
        empty: "new Set()",
        insert: "add",
    };

    fn element<'k>(&self, kind: &'k ValueKind) -> GenerateResult<&'k ValueKind> {
        match kind {
            ValueKind::Array(element) | ValueKind::List(element) | ValueKind::Set(element) => {
                Ok(element)
            }
            other => Err(mismatched(other, self.name)),
        }
    }
}

impl EmissionStrategy for Sequence {
    fn emit_write(
        &self,
        emission: &mut Emission<'_>,
        source: &str,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<CodeFragment> {
        let element_kind = self.element(kind)?;
        let element = emission.fresh("element");
        let body = emission.write(element_kind, &element, depth + 2)?;

        let mut code = CodeFragment::at(depth);
        code.line(format!("if ({source} == null) {{"))
            .indented(1, "buffer.writeInt(0);")
            .line("} else {")
            .indented(1, format!("buffer.writeInt({source}.{});", self.length))
            .indented(1, format!("{source}.forEach({element} => {{"));
        code.append(body);
        code.indented(1, "});").line("}");
        Ok(code)
    }

    fn emit_read(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<ReadFragment> {
        let element_kind = self.element(kind)?;
        let Some(declaration) = self.emit_declare(emission, depth, kind) else {
            return Err(mismatched(kind, self.name));
        };
        let size = emission.fresh("size");
        let index = emission.fresh("index");
        let element = emission.read(element_kind, depth + 2)?;

        let mut code = declaration.statements;
        code.line(format!("const {size} = buffer.readInt();"))
            .line(format!("if ({size} > 0) {{"))
            .indented(
                1,
                format!("for (let {index} = 0; {index} < {size}; {index}++) {{"),
            );
        code.append(element.statements);
        code.indented(2, format!("{}.{}({});", declaration.name, self.insert, element.expr))
            .indented(1, "}")
            .line("}");

        Ok(ReadFragment {
            statements: code,
            expr: declaration.name,
        })
    }

    fn emit_declare(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        _kind: &ValueKind,
    ) -> Option<Declaration> {
        let name = emission.fresh("result");
        let mut statements = CodeFragment::at(depth);
        statements.line(format!("const {name} = {};", self.empty));
        Some(Declaration { name, statements })
    }
}

// ============================================================================
// Maps
// ============================================================================

/// Size prefix followed by key/value pairs, key first.
#[derive(Debug, Clone, Copy)]
pub struct MapEntries;

impl MapEntries {
    fn entry<'k>(kind: &'k ValueKind) -> GenerateResult<(&'k ValueKind, &'k ValueKind)> {
        match kind {
            ValueKind::Map(key, value) => Ok((key, value)),
            other => Err(mismatched(other, "map")),
        }
    }
}

impl EmissionStrategy for MapEntries {
    fn emit_write(
        &self,
        emission: &mut Emission<'_>,
        source: &str,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<CodeFragment> {
        let (key_kind, value_kind) = Self::entry(kind)?;
        let key = emission.fresh("key");
        let value = emission.fresh("value");
        let key_code = emission.write(key_kind, &key, depth + 2)?;
        let value_code = emission.write(value_kind, &value, depth + 2)?;

        let mut code = CodeFragment::at(depth);
        code.line(format!("if ({source} == null) {{"))
            .indented(1, "buffer.writeInt(0);")
            .line("} else {")
            .indented(1, format!("buffer.writeInt({source}.size);"))
            .indented(1, format!("{source}.forEach(({value}, {key}) => {{"));
        code.append(key_code);
        code.append(value_code);
        code.indented(1, "});").line("}");
        Ok(code)
    }

    fn emit_read(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<ReadFragment> {
        let (key_kind, value_kind) = Self::entry(kind)?;
        let Some(declaration) = self.emit_declare(emission, depth, kind) else {
            return Err(mismatched(kind, "map"));
        };
        let size = emission.fresh("size");
        let index = emission.fresh("index");
        let key = emission.read(key_kind, depth + 2)?;
        let value = emission.read(value_kind, depth + 2)?;

        let mut code = declaration.statements;
        code.line(format!("const {size} = buffer.readInt();"))
            .line(format!("if ({size} > 0) {{"))
            .indented(
                1,
                format!("for (let {index} = 0; {index} < {size}; {index}++) {{"),
            );
        code.append(key.statements);
        code.append(value.statements);
        code.indented(2, format!("{}.set({}, {});", declaration.name, key.expr, value.expr))
            .indented(1, "}")
            .line("}");

        Ok(ReadFragment {
            statements: code,
            expr: declaration.name,
        })
    }

    fn emit_declare(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        _kind: &ValueKind,
    ) -> Option<Declaration> {
        let name = emission.fresh("result");
        let mut statements = CodeFragment::at(depth);
        statements.line(format!("const {name} = new Map();"));
        Some(Declaration { name, statements })
    }
}

// ============================================================================
// Nested messages
// ============================================================================

/// Delegates to the nested message's own generated code via the registry.
#[derive(Debug, Clone, Copy)]
pub struct NestedMessage;

impl NestedMessage {
    fn protocol_id(kind: &ValueKind) -> GenerateResult<u16> {
        match kind {
            ValueKind::NestedMessage(id) => Ok(*id),
            other => Err(mismatched(other, "nested message")),
        }
    }
}

impl EmissionStrategy for NestedMessage {
    fn emit_write(
        &self,
        _emission: &mut Emission<'_>,
        source: &str,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<CodeFragment> {
        let id = Self::protocol_id(kind)?;
        let mut code = CodeFragment::at(depth);
        code.line(format!("buffer.writePacket({source}, {id});"));
        Ok(code)
    }

    fn emit_read(
        &self,
        emission: &mut Emission<'_>,
        depth: usize,
        kind: &ValueKind,
    ) -> GenerateResult<ReadFragment> {
        let id = Self::protocol_id(kind)?;
        let result = emission.fresh("result");
        let mut statements = CodeFragment::at(depth);
        statements.line(format!("const {result} = buffer.readPacket({id});"));
        Ok(ReadFragment {
            statements,
            expr: result,
        })
    }
}
