//! Per-message emission state

/// State threaded through the emission of one message.
///
/// Holds the counter that keeps generated temporaries unique within a
/// message. It is reset before every message so regenerating a schema always
/// produces the same names.
#[derive(Debug, Clone)]
pub struct EmitContext {
    message: String,
    next_index: usize,
    max_nesting_depth: usize,
}

impl EmitContext {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self {
            message: String::new(),
            next_index: 0,
            max_nesting_depth,
        }
    }

    /// Start a new message: clears the temporary counter.
    pub fn begin_message(&mut self, name: &str) {
        self.message.clear();
        self.message.push_str(name);
        self.next_index = 0;
    }

    /// Message currently being emitted.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fresh temporary name such as `result3`.
    pub fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}{}", self.next_index);
        self.next_index += 1;
        name
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn EmitContext___fresh___numbers_across_prefixes() {
        let mut ctx = EmitContext::new(8);

        assert_eq!(ctx.fresh("result"), "result0");
        assert_eq!(ctx.fresh("size"), "size1");
        assert_eq!(ctx.fresh("result"), "result2");
    }

    #[test]
    fn EmitContext___begin_message___resets_counter() {
        let mut ctx = EmitContext::new(8);
        ctx.begin_message("Player");
        ctx.fresh("result");
        ctx.fresh("result");

        ctx.begin_message("Team");

        assert_eq!(ctx.message(), "Team");
        assert_eq!(ctx.fresh("result"), "result0");
    }
}
