use core::{
    fmt::Debug,
    hash::Hash,
    num::{NonZeroU64, NonZeroUsize},
};

/// Raw index into an `Arena`. Indexes start at 1 so that `Option<Inx>` gets
/// the niche optimization.
pub(crate) type Inx = NonZeroUsize;

/// Generation counter type. Arenas start at generation 2 so that
/// `Ptr::invalid` can use generation 1.
pub(crate) type Gen = NonZeroU64;

#[inline]
pub(crate) fn gen_one() -> Gen {
    Gen::MIN
}

#[inline]
pub(crate) fn gen_two() -> Gen {
    gen_one().saturating_add(1)
}

#[inline]
pub(crate) fn gen_increment(gen: Gen) -> Gen {
    match gen.checked_add(1) {
        Some(gen) => gen,
        None => panic!("generation overflow"),
    }
}

/// Index and generation information for an entry of an `Arena`. Implemented
/// through `ptr_struct!`, never manually.
pub(crate) trait Ptr: Debug + Hash + Clone + Copy + PartialEq + Eq + PartialOrd + Ord {
    /// A `Ptr` at the maximum index with generation 1, which no arena can
    /// contain
    fn invalid() -> Self;

    fn inx(self) -> Inx;

    fn gen(self) -> Gen;

    fn _from_raw(inx: Inx, gen: Gen) -> Self;
}

/// Makes structs implementing `Ptr`, each optionally followed by a comma
/// separated list of attributes. Multiple structs are separated by semicolons.
macro_rules! ptr_struct {
    ($($struct_name:ident $($attributes:meta),*);*) => {
        $(
            $(#[$attributes])*
            #[derive(
                core::hash::Hash,
                core::clone::Clone,
                core::marker::Copy,
                core::cmp::PartialEq,
                core::cmp::Eq,
                core::cmp::PartialOrd,
                core::cmp::Ord
            )]
            pub(crate) struct $struct_name {
                // in this order `PartialOrd` orders primarily off of the index
                inx: $crate::ptr::Inx,
                gen: $crate::ptr::Gen,
            }

            impl $crate::ptr::Ptr for $struct_name {
                #[inline]
                fn invalid() -> Self {
                    Self {
                        inx: $crate::ptr::Inx::MAX,
                        gen: $crate::ptr::gen_one(),
                    }
                }

                #[inline]
                fn inx(self) -> $crate::ptr::Inx {
                    self.inx
                }

                #[inline]
                fn gen(self) -> $crate::ptr::Gen {
                    self.gen
                }

                #[inline]
                fn _from_raw(inx: $crate::ptr::Inx, gen: $crate::ptr::Gen) -> Self {
                    Self { inx, gen }
                }
            }

            impl core::default::Default for $struct_name {
                #[inline]
                fn default() -> Self {
                    $crate::ptr::Ptr::invalid()
                }
            }

            // manually implemented so that it has no newlines, which keeps the `Debug` output of
            // cursors and node dumps on one line
            impl core::fmt::Debug for $struct_name {
                fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                    write!(f, "{}[{}]({})", stringify!($struct_name), self.inx, self.gen)
                }
            }
        )*
    };
}

ptr_struct!(
    PSeq doc = "Points to a position of the element sequence";
    PNode doc = "Points to a node of the balancing tree"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_and_debug() {
        let p = PSeq::invalid();
        assert_eq!(p.gen().get(), 1);
        assert_eq!(p, PSeq::default());
        let p = PNode::_from_raw(Inx::new(3).unwrap(), gen_two());
        assert_eq!(format!("{p:?}"), "PNode[3](2)");
        assert_eq!(gen_increment(gen_two()).get(), 3);
    }

    #[test]
    #[should_panic(expected = "generation overflow")]
    fn gen_overflow() {
        let _ = gen_increment(Gen::MAX);
    }
}
