//! Per-field code emission for one message
//!
//! [`FieldCodeEmitter`] turns a message's ordered field list into the blocks
//! spliced into the message template. Fields are always visited in declaration
//! order; that order is part of the wire format.

use crate::context::EmitContext;
use crate::dispatch::{DispatchTable, Emission};
use crate::fragment::{CodeFragment, comment_lines};
use protogen_core::{
    FieldDefinition, GenerateError, GenerateResult, MessageDefinition, ProtocolDocument,
};
use tracing::debug;

/// Depth of statements inside the generated function bodies.
const BODY_DEPTH: usize = 1;

/// Blocks generated for one message, ready for template substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFragments {
    /// Comma-separated constructor parameters.
    pub parameters: String,
    pub constructor: CodeFragment,
    pub write: CodeFragment,
    pub read: CodeFragment,
}

/// Emits constructor, write and read blocks for a message's fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldCodeEmitter<'a> {
    dispatch: &'a DispatchTable,
}

impl<'a> FieldCodeEmitter<'a> {
    pub fn new(dispatch: &'a DispatchTable) -> Self {
        Self { dispatch }
    }

    /// Emit every block for `definition`.
    ///
    /// Resets the temporary counter in `context` first, so the output depends
    /// only on the definition.
    pub fn emit_message(
        &self,
        context: &mut EmitContext,
        definition: &MessageDefinition,
        document: &ProtocolDocument,
    ) -> GenerateResult<MessageFragments> {
        context.begin_message(&definition.name);

        let fragments = MessageFragments {
            parameters: Self::parameter_list(&definition.fields),
            constructor: Self::constructor_block(&definition.fields, document),
            write: self.write_block(context, &definition.fields)?,
            read: self.read_block(context, &definition.fields)?,
        };

        debug!(
            message = %definition.name,
            fields = definition.fields.len(),
            write_lines = fragments.write.line_count(),
            read_lines = fragments.read.line_count(),
            "emitted message fields"
        );
        Ok(fragments)
    }

    /// Field names in declaration order, joined for a parameter list.
    pub fn parameter_list(fields: &[FieldDefinition]) -> String {
        fields
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `this.name = name;` per field, preceded by its documentation and
    /// annotated with its declared type.
    pub fn constructor_block(fields: &[FieldDefinition], document: &ProtocolDocument) -> CodeFragment {
        let mut block = CodeFragment::at(BODY_DEPTH);
        for field in fields {
            if let Some(doc) = document.field(&field.name) {
                for line in comment_lines(doc) {
                    block.line(line);
                }
            }
            let description: Vec<&str> = field.type_description.split_whitespace().collect();
            block.line(format!(
                "this.{name} = {name}; // {}",
                description.join(" "),
                name = field.name
            ));
        }
        block
    }

    /// Unconditional write of every field, in order.
    pub fn write_block(
        &self,
        context: &mut EmitContext,
        fields: &[FieldDefinition],
    ) -> GenerateResult<CodeFragment> {
        let mut block = CodeFragment::at(BODY_DEPTH);
        for field in fields {
            check_nesting(context, field)?;
            let mut emission = Emission::new(self.dispatch, context);
            let code = emission.write(&field.kind, &format!("packet.{}", field.name), BODY_DEPTH)?;
            block.append(code);
        }
        Ok(block)
    }

    /// Read of every field into `packet`, in order.
    ///
    /// Each compatible field is preceded by its own readable-bytes guard that
    /// returns the partially populated packet.
    pub fn read_block(
        &self,
        context: &mut EmitContext,
        fields: &[FieldDefinition],
    ) -> GenerateResult<CodeFragment> {
        let mut block = CodeFragment::at(BODY_DEPTH);
        for field in fields {
            check_nesting(context, field)?;
            if field.compatible {
                block
                    .line("if (!buffer.isReadable()) {")
                    .indented(1, "return packet;")
                    .line("}");
            }
            let mut emission = Emission::new(self.dispatch, context);
            let read = emission.read(&field.kind, BODY_DEPTH)?;
            block.append(read.statements);
            block.line(format!("packet.{} = {};", field.name, read.expr));
        }
        Ok(block)
    }
}

fn check_nesting(context: &EmitContext, field: &FieldDefinition) -> GenerateResult<()> {
    let limit = context.max_nesting_depth();
    if field.kind.nesting_depth() > limit {
        return Err(GenerateError::NestingTooDeep {
            field: format!("{}.{}", context.message(), field.name),
            limit,
        });
    }
    Ok(())
}
