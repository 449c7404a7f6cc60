use std::fmt;

#[derive(Debug, Clone, Copy)]
enum Segment<'a> {
    Root,
    Field(&'a str),
    Index(usize),
}

/// Location of a value inside a generic record tree
///
/// Paths borrow their parent, so building one while descending into nested
/// messages never allocates. Rendering is only needed for errors and drop
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct FieldPath<'a> {
    parent: Option<&'a FieldPath<'a>>,
    segment: Segment<'a>,
}

impl FieldPath<'static> {
    pub fn root() -> Self {
        FieldPath {
            parent: None,
            segment: Segment::Root,
        }
    }
}

impl<'a> FieldPath<'a> {
    pub fn field<'b>(&'b self, name: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Field(name),
        }
    }

    pub fn index(&self, index: usize) -> FieldPath<'_> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = vec![self.segment];
        let mut current = self.parent;
        while let Some(path) = current {
            segments.push(path.segment);
            current = path.parent;
        }
        segments.reverse();
        segments
    }

    fn render(&self, with_indices: bool) -> String {
        let mut out = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Root => {}
                Segment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                Segment::Index(i) if with_indices => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
                Segment::Index(_) => {}
            }
        }
        if out.is_empty() {
            out.push_str("<root>");
        }
        out
    }

    /// Path with element indices, e.g. `backupManga[3].chapters[0].read`
    pub fn to_indexed_string(&self) -> String {
        self.render(true)
    }

    /// Path without indices, e.g. `backupManga.chapters.read`
    pub fn to_schema_string(&self) -> String {
        self.render(false)
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_indexed_string())
    }
}
