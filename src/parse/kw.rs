//! Keywords of the formula language.

#![allow(non_upper_case_globals)]

crate::prelude!();

macro_rules! build_keywords {
    {
        $(
            $(#[$mod_meta:meta])*
            $mod_ident:ident {
                $(
                    $(#[$kw_meta:meta])*
                    $kw_ident:ident : $kw_str:expr
                ),*
                $(,)?
            }
        )*
    } => {
        $(
            $(#[$mod_meta])*
            pub mod $mod_ident {
                $(
                    $(#[$kw_meta])*
                    pub const $kw_ident: &str = $kw_str;
                )*
            }
        )*

        lazy_static::lazy_static! {
            /// Set of all the keywords.
            pub static ref all: Set<&'static str> = {
                let mut set = Set::new();
                $($(
                    let is_new = set.insert($kw_str);
                    if !is_new {
                        panic!("[internal] keyword `{}` is defined twice", $kw_str)
                    }
                )*)*
                set
            };
        }
    };
}

build_keywords! {
    /// Structural keywords, illegal as identifiers.
    main {
        /// ITE's *if*.
        op_ite_if: "if",
        /// ITE's *else*.
        op_ite_else: "else",
        /// True constant.
        cst_true: "true",
        /// False constant.
        cst_false: "false",
        /// Conjunction.
        op_and: "and",
        /// Disjunction.
        op_or: "or",
        /// Negation.
        op_not: "not",
    }
}

/// Legal spellings of the index variable.
///
/// Both denote the same index: `n` is conventional in base formulas, `k` in
/// induction steps. Any other identifier is rejected at compile time.
pub mod var {
    /// Conventional spelling in base formulas.
    pub const n: &str = "n";
    /// Conventional spelling in induction steps.
    pub const k: &str = "k";
}
