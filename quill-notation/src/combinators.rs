//! Choice and join combinators.

use crate::{Kind, Notation};

impl Notation {
    /// Interleave `items` with `separator`.
    pub fn join(items: impl IntoIterator<Item = Notation>, separator: Notation) -> Notation {
        let mut parts = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                parts.push(separator.clone());
            }
            parts.push(item);
        }
        Notation::concat(parts)
    }

    /// Merge the choice points of a sequence into a single choice.
    ///
    /// The flat alternative concatenates every input with its choices taken
    /// flat and the broken alternative every input with its choices taken
    /// broken, so the printer makes one decision for the whole line instead of
    /// one per input. Inputs without choices contribute the same document to
    /// both sides. Choices after the first mandatory break are left in place,
    /// since they start a new line and are decided on their own.
    pub fn hoist(items: impl IntoIterator<Item = Notation>) -> Notation {
        let joined = Notation::concat(items);
        if !joined.measure().choices {
            return joined;
        }
        let (flat, _) = joined.commit(true);
        let (broken, _) = joined.commit(false);
        flat.or(broken)
    }

    /// Replace every choice before the first mandatory break with one of its
    /// alternatives.
    ///
    /// Returns the committed notation and whether the walk reached a break,
    /// counting a choice whose flat alternative breaks as a break. The chosen
    /// alternatives themselves are kept as built, so nested choices inside
    /// them are still decided by the printer.
    pub(crate) fn commit(&self, flat: bool) -> (Notation, bool) {
        let measure = self.measure();
        if !measure.choices {
            return (self.clone(), measure.breaks);
        }
        match self.kind() {
            Kind::Choice {
                flat: compact,
                broken,
            } => {
                let chosen = if flat { compact } else { broken };
                (chosen.clone(), compact.measure().breaks)
            }
            Kind::Concat(items) => {
                let mut parts = Vec::with_capacity(items.len());
                let mut stopped = false;
                for item in items {
                    if stopped {
                        parts.push(item.clone());
                    } else {
                        let (item, reached) = item.commit(flat);
                        parts.push(item);
                        stopped = reached;
                    }
                }
                (Notation::concat(parts), stopped)
            }
            Kind::Indent { inner, margin } => {
                let (inner, stopped) = inner.commit(flat);
                let kind = Kind::Indent {
                    inner,
                    margin: margin.clone(),
                };
                (Notation::from_kind(kind), stopped)
            }
            Kind::Statement(inner) => {
                let (inner, stopped) = inner.commit(flat);
                (Notation::from_kind(Kind::Statement(inner)), stopped)
            }
            Kind::Suppressed(inner) => {
                let (inner, stopped) = inner.commit(flat);
                (Notation::from_kind(Kind::Suppressed(inner)), stopped)
            }
            Kind::Scoped { inner, scope } => {
                let (inner, stopped) = inner.commit(flat);
                let kind = Kind::Scoped {
                    inner,
                    scope: scope.clone(),
                };
                (Notation::from_kind(kind), stopped)
            }
            Kind::Empty
            | Kind::Text(_)
            | Kind::Line
            | Kind::TypeRef(_)
            | Kind::StaticImportRef { .. } => (self.clone(), measure.breaks),
        }
    }
}
