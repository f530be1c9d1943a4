//! Balanced-tree text buffer for very large documents.
//!
//! The tree variant stores text as a height-balanced binary tree over bounded
//! chunks. Internal nodes cache the character length of their left subtree
//! (`weight`), total length, newline count, and height, which makes
//! offset-based and line-based lookups O(log n). Insert and delete are
//! split-then-concatenate; concatenation rebalances with height rotations.

/// Maximum characters stored in a single leaf chunk.
const MAX_CHUNK: usize = 1024;

#[derive(Debug)]
enum Node {
    Leaf {
        text: String,
        /// Character count of `text`.
        chars: usize,
        /// Newline count of `text`.
        newlines: usize,
    },
    Internal {
        left: Box<Node>,
        right: Box<Node>,
        /// Character length of the left subtree; routes offset descent.
        weight: usize,
        chars: usize,
        newlines: usize,
        height: u32,
    },
}

impl Node {
    fn leaf(text: String) -> Box<Node> {
        let chars = text.chars().count();
        let newlines = text.bytes().filter(|&b| b == b'\n').count();
        Box::new(Node::Leaf {
            text,
            chars,
            newlines,
        })
    }

    fn chars(&self) -> usize {
        match self {
            Node::Leaf { chars, .. } => *chars,
            Node::Internal { chars, .. } => *chars,
        }
    }

    fn newlines(&self) -> usize {
        match self {
            Node::Leaf { newlines, .. } => *newlines,
            Node::Internal { newlines, .. } => *newlines,
        }
    }

    fn height(&self) -> u32 {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { height, .. } => *height,
        }
    }
}

fn make_internal(left: Box<Node>, right: Box<Node>) -> Box<Node> {
    let weight = left.chars();
    let chars = weight + right.chars();
    let newlines = left.newlines() + right.newlines();
    let height = left.height().max(right.height()) + 1;
    Box::new(Node::Internal {
        left,
        right,
        weight,
        chars,
        newlines,
        height,
    })
}

fn rotate_left(node: Box<Node>) -> Box<Node> {
    match *node {
        Node::Internal { left, right, .. } => match *right {
            Node::Internal {
                left: rl,
                right: rr,
                ..
            } => make_internal(make_internal(left, rl), rr),
            leaf => make_internal(left, Box::new(leaf)),
        },
        leaf => Box::new(leaf),
    }
}

fn rotate_right(node: Box<Node>) -> Box<Node> {
    match *node {
        Node::Internal { left, right, .. } => match *left {
            Node::Internal {
                left: ll,
                right: lr,
                ..
            } => make_internal(ll, make_internal(lr, right)),
            leaf => make_internal(Box::new(leaf), right),
        },
        leaf => Box::new(leaf),
    }
}

/// Restore the height invariant at this node after a concatenation.
///
/// When one side is more than 1 taller, rotate toward the shorter side; when
/// the taller child leans the opposite way (double imbalance), rotate that
/// child first.
fn rebalance(node: Box<Node>) -> Box<Node> {
    let (left, right) = match *node {
        Node::Internal { left, right, .. } => (left, right),
        leaf => return Box::new(leaf),
    };

    if left.height() > right.height() + 1 {
        let left = if matches!(&*left, Node::Internal { left: ll, right: lr, .. } if ll.height() < lr.height())
        {
            rotate_left(left)
        } else {
            left
        };
        rotate_right(make_internal(left, right))
    } else if right.height() > left.height() + 1 {
        let right = if matches!(&*right, Node::Internal { left: rl, right: rr, .. } if rr.height() < rl.height())
        {
            rotate_right(right)
        } else {
            right
        };
        rotate_left(make_internal(left, right))
    } else {
        make_internal(left, right)
    }
}

/// Concatenate two trees, descending the taller spine so the join point has
/// comparable heights, then rebalancing on the way back up.
fn concat(a: Box<Node>, b: Box<Node>) -> Box<Node> {
    // Absorb small adjacent leaves into one chunk.
    if let (Node::Leaf { .. }, Node::Leaf { .. }) = (&*a, &*b)
        && a.chars() + b.chars() <= MAX_CHUNK
    {
        let (Node::Leaf { text: mut ta, .. }, Node::Leaf { text: tb, .. }) = (*a, *b) else {
            unreachable!("matched leaves above");
        };
        ta.push_str(&tb);
        return Node::leaf(ta);
    }

    let (ha, hb) = (a.height(), b.height());
    if ha.abs_diff(hb) <= 1 {
        return make_internal(a, b);
    }

    if ha > hb {
        // `a` is internal: a leaf has height 1 and `ha > hb + 1 >= 2`.
        let Node::Internal { left, right, .. } = *a else {
            unreachable!("height > 1 implies internal node");
        };
        rebalance(make_internal(left, concat(right, b)))
    } else {
        let Node::Internal { left, right, .. } = *b else {
            unreachable!("height > 1 implies internal node");
        };
        rebalance(make_internal(concat(a, left), right))
    }
}

fn concat_opt(a: Option<Box<Node>>, b: Option<Box<Node>>) -> Option<Box<Node>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(concat(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Byte index of the `char_idx`-th character of `text`.
fn byte_of_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Split a tree at a character index into two trees.
fn split(node: Box<Node>, idx: usize) -> (Option<Box<Node>>, Option<Box<Node>>) {
    match *node {
        Node::Leaf { text, chars, .. } => {
            if idx == 0 {
                (None, Some(Node::leaf(text)))
            } else if idx >= chars {
                (Some(Node::leaf(text)), None)
            } else {
                let at = byte_of_char(&text, idx);
                let right = text[at..].to_string();
                let mut left = text;
                left.truncate(at);
                (Some(Node::leaf(left)), Some(Node::leaf(right)))
            }
        }
        Node::Internal {
            left,
            right,
            weight,
            ..
        } => {
            if idx < weight {
                let (ll, lr) = split(left, idx);
                (ll, concat_opt(lr, Some(right)))
            } else {
                let (rl, rr) = split(right, idx - weight);
                (concat_opt(Some(left), rl), rr)
            }
        }
    }
}

fn char_at(node: &Node, idx: usize) -> Option<char> {
    match node {
        Node::Leaf { text, chars, .. } => {
            if idx >= *chars {
                return None;
            }
            text.chars().nth(idx)
        }
        Node::Internal {
            left,
            right,
            weight,
            ..
        } => {
            if idx < *weight {
                char_at(left, idx)
            } else {
                char_at(right, idx - weight)
            }
        }
    }
}

/// Append the characters in `[start, end)` (clamped to the node) to `out`.
fn write_slice(node: &Node, start: usize, end: usize, out: &mut String) {
    if start >= end {
        return;
    }
    match node {
        Node::Leaf { text, chars, .. } => {
            let end = end.min(*chars);
            if start >= end {
                return;
            }
            let from = byte_of_char(text, start);
            let to = byte_of_char(text, end);
            out.push_str(&text[from..to]);
        }
        Node::Internal {
            left,
            right,
            weight,
            ..
        } => {
            if start < *weight {
                write_slice(left, start, end.min(*weight), out);
            }
            if end > *weight {
                write_slice(right, start.saturating_sub(*weight), end - weight, out);
            }
        }
    }
}

/// Number of newlines strictly before character offset `offset`.
fn newlines_before(node: &Node, offset: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => text
            .chars()
            .take(offset)
            .filter(|&ch| ch == '\n')
            .count(),
        Node::Internal {
            left,
            right,
            weight,
            ..
        } => {
            if offset <= *weight {
                newlines_before(left, offset)
            } else {
                left.newlines() + newlines_before(right, offset - weight)
            }
        }
    }
}

/// Character offset of the `n`-th newline (0-based). `n` must be in bounds.
fn offset_of_newline(node: &Node, n: usize) -> usize {
    match node {
        Node::Leaf { text, .. } => text
            .chars()
            .enumerate()
            .filter(|(_, ch)| *ch == '\n')
            .nth(n)
            .map(|(i, _)| i)
            .expect("newline index within node"),
        Node::Internal {
            left,
            right,
            weight,
            ..
        } => {
            let left_newlines = left.newlines();
            if n < left_newlines {
                offset_of_newline(left, n)
            } else {
                weight + offset_of_newline(right, n - left_newlines)
            }
        }
    }
}

/// Build a balanced tree from `text`, chunked into bounded leaves.
fn build(text: &str) -> Option<Box<Node>> {
    if text.is_empty() {
        return None;
    }

    let mut leaves: Vec<Box<Node>> = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let cut = byte_of_char(rest, MAX_CHUNK);
        leaves.push(Node::leaf(rest[..cut].to_string()));
        rest = &rest[cut..];
    }

    Some(build_balanced(leaves))
}

/// Recursive halving keeps sibling heights within 1 for any leaf count.
fn build_balanced(mut leaves: Vec<Box<Node>>) -> Box<Node> {
    if leaves.len() == 1 {
        return leaves.pop().expect("non-empty leaf list");
    }
    let right = leaves.split_off(leaves.len() / 2);
    make_internal(build_balanced(leaves), build_balanced(right))
}

/// A balanced-tree text buffer.
///
/// All coordinates are character offsets. Callers are expected to validate
/// offsets against [`TreeBuffer::char_len`] before mutating; the wrapping
/// storage layer reports out-of-bounds edits as errors.
#[derive(Debug)]
pub struct TreeBuffer {
    root: Option<Box<Node>>,
}

impl TreeBuffer {
    /// Build a tree buffer from initial text.
    pub fn from_text(text: &str) -> Self {
        Self { root: build(text) }
    }

    /// Total character count.
    pub fn char_len(&self) -> usize {
        self.root.as_deref().map_or(0, Node::chars)
    }

    /// Total line count. An empty buffer has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.root.as_deref().map_or(0, Node::newlines) + 1
    }

    /// Insert `text` at character offset `offset` (pre-validated).
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let middle = build(text);
        let (left, right) = match self.root.take() {
            Some(root) => split(root, offset),
            None => (None, None),
        };
        self.root = concat_opt(concat_opt(left, middle), right);
    }

    /// Delete the characters in `[start, end)` (pre-validated).
    pub fn delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let Some(root) = self.root.take() else {
            return;
        };
        let (left, rest) = split(root, start);
        let right = rest.and_then(|rest| split(rest, end - start).1);
        self.root = concat_opt(left, right);
    }

    /// The full content. O(n); used sparingly.
    pub fn content(&self) -> String {
        self.slice(0, self.char_len())
    }

    /// The characters in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        if let Some(root) = self.root.as_deref() {
            write_slice(root, start, end, &mut out);
        }
        out
    }

    /// The character at `offset`, if in bounds.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.root.as_deref().and_then(|root| char_at(root, offset))
    }

    /// The line index containing character offset `offset`.
    ///
    /// `offset == char_len()` maps to the last line.
    pub fn line_index(&self, offset: usize) -> usize {
        match self.root.as_deref() {
            Some(root) => newlines_before(root, offset.min(root.chars())),
            None => 0,
        }
    }

    /// The character offset of the start of line `line` (pre-validated).
    pub fn offset_of_line(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let root = self.root.as_deref().expect("non-empty buffer for line > 0");
        offset_of_newline(root, line - 1) + 1
    }

    #[cfg(test)]
    fn assert_balanced(&self) {
        fn check(node: &Node) -> u32 {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal {
                    left,
                    right,
                    weight,
                    chars,
                    newlines,
                    height,
                } => {
                    let hl = check(left);
                    let hr = check(right);
                    assert!(hl.abs_diff(hr) <= 1, "imbalanced node: {hl} vs {hr}");
                    assert_eq!(*height, hl.max(hr) + 1);
                    assert_eq!(*weight, left.chars());
                    assert_eq!(*chars, left.chars() + right.chars());
                    assert_eq!(*newlines, left.newlines() + right.newlines());
                    *height
                }
            }
        }
        if let Some(root) = self.root.as_deref() {
            check(root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_roundtrip() {
        let buffer = TreeBuffer::from_text("Hello\nWorld");
        assert_eq!(buffer.content(), "Hello\nWorld");
        assert_eq!(buffer.char_len(), 11);
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = TreeBuffer::from_text("");
        assert_eq!(buffer.content(), "");
        assert_eq!(buffer.char_len(), 0);
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_index(0), 0);
        assert_eq!(buffer.offset_of_line(0), 0);
    }

    #[test]
    fn test_insert_middle() {
        let mut buffer = TreeBuffer::from_text("Hlo");
        buffer.insert(1, "el");
        assert_eq!(buffer.content(), "Hello");
        buffer.assert_balanced();
    }

    #[test]
    fn test_delete_range() {
        let mut buffer = TreeBuffer::from_text("Hello, World");
        buffer.delete(5, 7);
        assert_eq!(buffer.content(), "HelloWorld");
        buffer.assert_balanced();
    }

    #[test]
    fn test_multi_byte_chunks() {
        let mut buffer = TreeBuffer::from_text("你好世界");
        assert_eq!(buffer.char_len(), 4);
        buffer.insert(2, "，");
        assert_eq!(buffer.content(), "你好，世界");
        assert_eq!(buffer.char_at(2), Some('，'));
    }

    #[test]
    fn test_line_lookups() {
        let buffer = TreeBuffer::from_text("First line\nSecond line\nThird");
        assert_eq!(buffer.offset_of_line(0), 0);
        assert_eq!(buffer.offset_of_line(1), 11);
        assert_eq!(buffer.offset_of_line(2), 23);
        assert_eq!(buffer.line_index(0), 0);
        assert_eq!(buffer.line_index(10), 0);
        assert_eq!(buffer.line_index(11), 1);
        assert_eq!(buffer.line_index(23), 2);
        assert_eq!(buffer.line_index(buffer.char_len()), 2);
    }

    #[test]
    fn test_slice_spans_chunks() {
        let line = "abcdefghij\n";
        let text = line.repeat(500); // well past one chunk
        let buffer = TreeBuffer::from_text(&text);
        assert_eq!(buffer.char_len(), text.chars().count());
        assert_eq!(buffer.slice(1015, 1030), text[1015..1030].to_string());
        buffer.assert_balanced();
    }

    #[test]
    fn test_balance_after_skewed_inserts() {
        let mut buffer = TreeBuffer::from_text("");
        for _ in 0..200 {
            let len = buffer.char_len();
            buffer.insert(len, &"x".repeat(700));
            buffer.assert_balanced();
        }
        assert_eq!(buffer.char_len(), 200 * 700);
    }

    #[test]
    fn test_balance_after_front_inserts() {
        let mut buffer = TreeBuffer::from_text("");
        for i in 0..200 {
            buffer.insert(0, &format!("line {i}\n"));
        }
        buffer.assert_balanced();
        assert_eq!(buffer.line_count(), 201);
    }

    #[test]
    fn test_random_edits_match_string_model() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let mut rng = StdRng::seed_from_u64(42);
        let mut model = String::from("seed text\nwith lines\n");
        let mut buffer = TreeBuffer::from_text(&model);

        for _ in 0..500 {
            let len = model.chars().count();
            if rng.gen_bool(0.6) || len == 0 {
                let at = rng.gen_range(0..=len);
                let chunk = match rng.gen_range(0..3) {
                    0 => "a",
                    1 => "\n",
                    _ => "xyz文",
                };
                let byte_at = byte_of_char(&model, at);
                model.insert_str(byte_at, chunk);
                buffer.insert(at, chunk);
            } else {
                let start = rng.gen_range(0..len);
                let end = (start + rng.gen_range(1..=4)).min(len);
                let byte_start = byte_of_char(&model, start);
                let byte_end = byte_of_char(&model, end);
                model.replace_range(byte_start..byte_end, "");
                buffer.delete(start, end);
            }
        }

        assert_eq!(buffer.content(), model);
        assert_eq!(buffer.char_len(), model.chars().count());
        assert_eq!(
            buffer.line_count(),
            model.bytes().filter(|&b| b == b'\n').count() + 1
        );
        buffer.assert_balanced();
    }

    #[test]
    fn test_line_offset_roundtrip_large() {
        let text = (0..5000)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let buffer = TreeBuffer::from_text(&text);
        assert_eq!(buffer.line_count(), 5000);
        for line in [0, 1, 17, 999, 2500, 4999] {
            let offset = buffer.offset_of_line(line);
            assert_eq!(buffer.line_index(offset), line);
        }
    }
}
