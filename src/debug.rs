/*
 * Copyright (c) 2006-Present, Redis Ltd.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Debug rendering.
//!
//! Compact single-line renderings of tree structure for test assertions
//! and troubleshooting. A red-black node prints as `key:R` or `key:B`
//! followed by its children in parentheses when it has any; an absent
//! child prints as `·`. An energy node prints as `key/size/energy`.
//!
//! ```text
//! 10:B(5:B(3:R,7:R),15:B)
//! 4/7/2(2/3/0(1/1/0,3/1/0),6/3/1(5/1/0,7/1/0))
//! ```

use std::fmt::Write;

use crate::arena::{Arena, Link};
use crate::energy::EnergyEntry;
use crate::node::{Color, RbEntry};
use crate::rbtree::{left_of, right_of};

/// Render the red-black structure under `root`, labelling each node with
/// `label` and its colour.
pub fn rb_structure<T, F>(arena: &Arena<T>, root: Link, label: F) -> String
where
    T: RbEntry,
    F: Fn(&T) -> String,
{
    let mut out = String::new();
    write_rb(arena, root, &label, &mut out);
    out
}

fn write_rb<T, F>(arena: &Arena<T>, link: Link, label: &F, out: &mut String)
where
    T: RbEntry,
    F: Fn(&T) -> String,
{
    let Some(n) = link else {
        out.push('·');
        return;
    };

    let color = match arena[n].rb_head().color() {
        Color::Red => 'R',
        Color::Black => 'B',
    };
    let _ = write!(out, "{}:{}", label(&arena[n]), color);

    let (left, right) = (left_of(arena, n), right_of(arena, n));
    if left.is_some() || right.is_some() {
        out.push('(');
        write_rb(arena, left, label, out);
        out.push(',');
        write_rb(arena, right, label, out);
        out.push(')');
    }
}

/// Render the energy-tree structure under `root`, labelling each node with
/// `label` plus its size and energy counters.
pub fn energy_structure<T, F>(arena: &Arena<T>, root: Link, label: F) -> String
where
    T: EnergyEntry,
    F: Fn(&T) -> String,
{
    let mut out = String::new();
    write_energy(arena, root, &label, &mut out);
    out
}

fn write_energy<T, F>(arena: &Arena<T>, link: Link, label: &F, out: &mut String)
where
    T: EnergyEntry,
    F: Fn(&T) -> String,
{
    let Some(n) = link else {
        out.push('·');
        return;
    };

    let head = arena[n].energy_head();
    let _ = write!(out, "{}/{}/{}", label(&arena[n]), head.size(), head.energy());

    let (left, right) = (head.left(), head.right());
    if left.is_some() || right.is_some() {
        out.push('(');
        write_energy(arena, left, label, out);
        out.push(',');
        write_energy(arena, right, label, out);
        out.push(')');
    }
}

/// The depth of the deepest node under `root` (0 for an empty link), over
/// red-black links.
pub fn rb_depth<T: RbEntry>(arena: &Arena<T>, root: Link) -> usize {
    fn go<T: RbEntry>(arena: &Arena<T>, link: Link) -> usize {
        match link {
            None => 0,
            Some(n) => {
                1 + go(arena, left_of(arena, n)).max(go(arena, right_of(arena, n)))
            }
        }
    }
    go(arena, root)
}

/// The depth of the deepest node under `root`, over energy links.
pub fn energy_depth<T: EnergyEntry>(arena: &Arena<T>, root: Link) -> usize {
    fn go<T: EnergyEntry>(arena: &Arena<T>, link: Link) -> usize {
        match link {
            None => 0,
            Some(n) => {
                let head = arena[n].energy_head();
                1 + go(arena, head.left()).max(go(arena, head.right()))
            }
        }
    }
    go(arena, root)
}
