/// Byte tries used to find every affix that could apply to a word
/// without scanning the whole affix table.
///
/// Prefixes are stored front to back and suffixes back to front, so a
/// lookup only has to walk the word once from the relevant end.

#[derive(Clone, Debug)]
struct Node<T> {
    end_here: Vec<T>,
    /// Sorted by byte so lookups can binary search.
    more: Vec<(u8, Node<T>)>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            end_here: Vec::new(),
            more: Vec::new(),
        }
    }
}

impl<T: Copy> Node<T> {
    fn insert(&mut self, mut bytes: impl Iterator<Item = u8>, t: T) {
        let mut ptr = self;
        loop {
            let Some(b) = bytes.next() else {
                ptr.end_here.push(t);
                return;
            };
            let idx = match ptr.more.binary_search_by_key(&b, |(k, _)| *k) {
                Ok(idx) => idx,
                Err(idx) => {
                    ptr.more.insert(idx, (b, Node::default()));
                    idx
                }
            };
            ptr = &mut ptr.more[idx].1;
        }
    }

    fn lookup(
        &self,
        mut bytes: impl Iterator<Item = u8>,
        mut found: impl FnMut(T) -> bool,
    ) -> bool {
        let mut ptr = self;
        loop {
            for t in ptr.end_here.iter() {
                if found(*t) {
                    return true;
                }
            }
            let Some(b) = bytes.next() else {
                return false;
            };
            match ptr.more.binary_search_by_key(&b, |(k, _)| *k) {
                Ok(idx) => ptr = &ptr.more[idx].1,
                Err(_) => return false,
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrefixTrie<T> {
    root: Node<T>,
}

impl<T: Copy> PrefixTrie<T> {
    pub fn insert(&mut self, prefix: &str, t: T) {
        self.root.insert(prefix.bytes(), t);
    }

    /// Calls `found` for every stored prefix of `word`, shortest first,
    /// until it returns true.
    pub fn lookup(&self, word: &str, found: impl FnMut(T) -> bool) -> bool {
        self.root.lookup(word.bytes(), found)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SuffixTrie<T> {
    root: Node<T>,
}

impl<T: Copy> SuffixTrie<T> {
    pub fn insert(&mut self, suffix: &str, t: T) {
        self.root.insert(suffix.bytes().rev(), t);
    }

    /// Calls `found` for every stored suffix of `word`, shortest first,
    /// until it returns true.
    pub fn lookup(&self, word: &str, found: impl FnMut(T) -> bool) -> bool {
        self.root.lookup(word.bytes().rev(), found)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect_prefixes(st: &PrefixTrie<i8>, word: &str) -> Vec<i8> {
        let mut v = Vec::new();
        st.lookup(word, |i| {
            v.push(i);
            false
        });
        v
    }

    #[test]
    fn test_prefix_trie() {
        let mut st: PrefixTrie<i8> = PrefixTrie::default();

        st.insert("re", 1);
        st.insert("dis", 2);
        st.insert("redis", 3);
        st.insert("", 0);

        assert_eq!(vec![0, 1], collect_prefixes(&st, "reapply"));
        assert_eq!(vec![0, 1, 3], collect_prefixes(&st, "redistribute"));
        assert_eq!(vec![0], collect_prefixes(&st, "apply"));
    }

    #[test]
    fn test_suffix_trie() {
        let mut st: SuffixTrie<i8> = SuffixTrie::default();

        st.insert("s", 1);
        st.insert("ing", 2);
        st.insert("ings", 3);
        st.insert("", 0);

        let mut v = Vec::new();
        st.lookup("settings", |i| {
            v.push(i);
            false
        });
        assert_eq!(vec![0, 1, 3], v);

        let mut v = Vec::new();
        st.lookup("settings", |i| {
            v.push(i);
            true
        });
        assert_eq!(vec![0], v);
    }

    #[test]
    fn test_multibyte_suffix() {
        let mut st: SuffixTrie<i8> = SuffixTrie::default();
        st.insert("ée", 1);

        let mut v = Vec::new();
        st.lookup("aimée", |i| {
            v.push(i);
            false
        });
        assert_eq!(vec![1], v);
    }
}
