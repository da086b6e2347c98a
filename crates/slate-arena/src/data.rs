use super::id::{Id, Identifier};

/// Append-only storage addressed by a typed identifier.
///
/// Identifiers are handed out in allocation order and stay valid for the
/// lifetime of the arena.
#[derive(Debug, Clone)]
pub struct Arena<I: Identifier, T> {
    items: Vec<T>,
    marker: std::marker::PhantomData<I>,
}

impl<I: Identifier, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            marker: std::marker::PhantomData,
        }
    }
}

impl<I: Identifier, T> Arena<I, T> {
    pub fn next_id(&self) -> I {
        I::from(Id(self.items.len()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocate a new item in the arena and return its identifier.
    pub fn alloc(&mut self, item: T) -> I {
        let id = self.next_id();
        self.items.push(item);
        id
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.into().raw())
    }

    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(raw, item)| (I::from(Id(raw)), item))
    }
}

impl<T, I: Identifier> std::ops::Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, index: I) -> &Self::Output {
        &self.items[index.into().raw()]
    }
}
