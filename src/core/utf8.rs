use unicode_segmentation::UnicodeSegmentation;

/// Iterator over grapheme clusters in a string slice.
///
/// Keyboard input is replayed one grapheme at a time, so an emoji with
/// modifiers or a base character with combining marks reaches the typing
/// algorithms as a single keystroke.
pub struct GraphemeIterator<'a> {
    iter: unicode_segmentation::Graphemes<'a>,
}

impl<'a> GraphemeIterator<'a> {
    /// Create a new GraphemeIterator from a string slice
    pub fn new(text: &'a str) -> Self {
        Self {
            iter: text.graphemes(true),
        }
    }
}

impl<'a> Iterator for GraphemeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl<'a> DoubleEndedIterator for GraphemeIterator<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back()
    }
}

/// Number of chars (columns) in a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the char at 0-based char index `n`, or the string length
/// when `n` is past the end
pub fn char_byte_index(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(idx, _)| idx)
}

/// Slice of `text` between two 0-based char indices
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let from = char_byte_index(text, start);
    let to = char_byte_index(text, end.max(start));
    &text[from..to]
}

/// Char at 0-based char index `n`
pub fn char_at(text: &str, n: usize) -> Option<char> {
    text.chars().nth(n)
}

/// Leading whitespace (spaces and tabs) of a line
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

/// Split text into lines, accepting both `\n` and `\r\n`
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
