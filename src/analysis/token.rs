/// Token produced by text analysis
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub position: u32, // Position in the field (for phrase queries)
    pub offset: usize, // Byte offset in the original text
}

impl Token {
    pub fn new(text: String, position: u32, offset: usize) -> Self {
        Token {
            text,
            position,
            offset,
        }
    }
}
