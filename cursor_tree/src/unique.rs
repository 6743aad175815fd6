use crate::{
    base::OrdBase,
    compare::Compare,
    cursor::Cursor,
    error::Error,
    ptr::PSeq,
};

/// The unique-key layer shared by `OrdMap` and `OrdSet`. At most one entry
/// per equivalence class of keys is stored, and inserting an equivalent key
/// reports the existing entry instead.
#[derive(Clone)]
pub(crate) struct Unique<K, V, C> {
    pub(crate) base: OrdBase<K, V, C>,
}

impl<K, V, C> Unique<K, V, C> {
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            base: OrdBase::with_cmp(cmp),
        }
    }

    /// Removes the entry at `c` and returns the cursor that followed it along
    /// with the entry. Returns the end cursor and `None` if `c` is not live.
    pub fn extract_at(&mut self, c: Cursor) -> (Cursor, Option<(K, V)>) {
        let p = match self.base.resolve(c) {
            Some(p) => p,
            None => return (self.base.end(), None),
        };
        match self.base.tree.remove(p) {
            Some(link) => {
                let next = self.base.cursor(link.next());
                (next, Some((link.t.k, link.t.v)))
            }
            None => (self.base.end(), None),
        }
    }
}

impl<K, V, C: Compare<K>> Unique<K, V, C> {
    fn cursor_of(&self, res: Result<PSeq, (PSeq, K, V)>) -> (Cursor, bool) {
        match res {
            Ok(p) => (self.base.cursor(Some(p)), true),
            Err((p, ..)) => (self.base.cursor(Some(p)), false),
        }
    }

    /// The search start for a hinted insertion, the end cursor hints at the
    /// greatest entry
    fn hint_start(&self, hint: Cursor) -> Option<PSeq> {
        if (hint.source == self.base.id) && hint.p.is_none() {
            self.base.tree.seq.last()
        } else {
            self.base.resolve(hint)
        }
    }

    fn insert_hinted(&mut self, hint: Cursor, k: K, v: V) -> Result<PSeq, (PSeq, K, V)> {
        match self.hint_start(hint) {
            Some(p) => self.base.tree.insert_linear(p, k, v),
            None => self.base.tree.insert(k, v),
        }
    }

    pub fn emplace(&mut self, k: K, v: V) -> (Cursor, bool) {
        let res = self.base.tree.insert(k, v);
        self.cursor_of(res)
    }

    pub fn emplace_hint(&mut self, hint: Cursor, k: K, v: V) -> (Cursor, bool) {
        let res = self.insert_hinted(hint, k, v);
        self.cursor_of(res)
    }

    pub fn insert_or_assign(&mut self, k: K, v: V) -> (Cursor, bool) {
        let res = self.base.tree.insert(k, v);
        self.assign_on_collision(res)
    }

    pub fn insert_or_assign_with_hint(&mut self, hint: Cursor, k: K, v: V) -> Cursor {
        let res = self.insert_hinted(hint, k, v);
        self.assign_on_collision(res).0
    }

    fn assign_on_collision(&mut self, res: Result<PSeq, (PSeq, K, V)>) -> (Cursor, bool) {
        match res {
            Ok(p) => (self.base.cursor(Some(p)), true),
            Err((p, _, v)) => {
                if let Some(entry) = self.base.tree.seq.get_mut(p) {
                    entry.v = v;
                }
                (self.base.cursor(Some(p)), false)
            }
        }
    }

    pub fn get(&self, k: &K) -> Result<&V, Error> {
        self.base
            .tree
            .find_key(k)
            .and_then(|p| self.base.tree.get_link(p))
            .map(|link| &link.v)
            .ok_or(Error::not_found("get"))
    }

    pub fn get_mut(&mut self, k: &K) -> Result<&mut V, Error> {
        let p = self.base.tree.find_key(k);
        p.and_then(|p| self.base.tree.seq.get_mut(p))
            .map(|entry| &mut entry.v)
            .ok_or(Error::not_found("get_mut"))
    }

    pub fn extract(&mut self, k: &K) -> Result<(K, V), Error> {
        self.base
            .tree
            .find_key(k)
            .and_then(|p| self.base.tree.remove(p))
            .map(|link| (link.t.k, link.t.v))
            .ok_or(Error::not_found("extract"))
    }

    /// Moves every entry of `source` whose key is not present in `self` into
    /// `self`. Entries with colliding keys stay in `source`.
    pub fn merge(&mut self, source: &mut Self) {
        // `source` is in key order, so the previous insertion is a close hint
        let mut hint: Option<PSeq> = None;
        let mut c = source.base.begin();
        loop {
            let collides = match source.base.key_at(c) {
                Some(k) => self.base.contains_key(k),
                None => break,
            };
            if collides {
                c = source.base.next(c);
                continue
            }
            let (next, entry) = source.extract_at(c);
            if let Some((k, v)) = entry {
                let res = match hint {
                    Some(p) => self.base.tree.insert_linear(p, k, v),
                    None => self.base.tree.insert(k, v),
                };
                hint = match res {
                    Ok(p) | Err((p, ..)) => Some(p),
                };
            }
            c = next;
        }
    }
}
