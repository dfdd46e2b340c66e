/// How a field is shaped on the wire relative to its flat representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Copied verbatim between wire and flat form.
    Scalar,
    /// A bare object on the wire, carried as a one-element list in the flat
    /// form. The asymmetry is a property of the flat representation and is
    /// preserved exactly on both passes.
    SingletonList,
}

/// One allow-listed field of a wire document.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub shape: FieldShape,
}

impl FieldSpec {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            shape: FieldShape::Scalar,
        }
    }

    pub const fn singleton_list(name: &'static str) -> Self {
        Self {
            name,
            shape: FieldShape::SingletonList,
        }
    }
}

/// Static allow-list of the fields one operation may read from or write to a
/// wire document. Never user-visible; declared once per object type.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionSpec {
    pub fields: &'static [FieldSpec],
}

impl ProjectionSpec {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Whether `name` is part of this allow-list.
    pub fn allows(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }
}
