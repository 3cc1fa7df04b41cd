//! Runtime-support files shipped with every generated tree

/// A file copied verbatim into the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeFile {
    /// Path relative to the output root, `/`-separated.
    pub path: &'static str,
    pub contents: &'static str,
}

/// Buffer runtime imported by generated messages and the registry.
pub const RUNTIME_FILES: &[RuntimeFile] = &[
    RuntimeFile {
        path: "buffer/ByteBuffer.js",
        contents: include_str!("../templates/javascript/buffer/ByteBuffer.js"),
    },
    RuntimeFile {
        path: "buffer/longbits.js",
        contents: include_str!("../templates/javascript/buffer/longbits.js"),
    },
];
