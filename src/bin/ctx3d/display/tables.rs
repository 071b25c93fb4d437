use std::collections::HashMap;
use std::io::{self, Write};

use ctfile_x3d::scene::NodeKind;
use ctfile_x3d::{Molecule, Scene, Structure};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_structure_info(structure: &Structure) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![("Name", display_name(structure.name()))];
    match structure {
        Structure::Molecule(molecule) => {
            rows.push(("Atoms", molecule.atom_count().to_string()));
            rows.push(("Bonds", molecule.bond_count().to_string()));
            rows.push(("Width", format!("{:.2}", molecule.width())));
        }
        Structure::Reaction(reaction) => {
            rows.push((
                "Reactants",
                format!(
                    "{} atoms, {} bonds",
                    reaction.reactants.atom_count(),
                    reaction.reactants.bond_count()
                ),
            ));
            rows.push((
                "Products",
                format!(
                    "{} atoms, {} bonds",
                    reaction.products.atom_count(),
                    reaction.products.bond_count()
                ),
            ));
        }
    }
    print_kv_table(&mut out, "Structure Summary", &rows);

    let molecule = match structure {
        Structure::Molecule(molecule) => molecule,
        Structure::Reaction(reaction) => &reaction.reactants,
    };
    print_element_distribution(&mut out, molecule);
}

pub fn print_scene_info(scene: &Scene) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let shared = scene
        .nodes()
        .filter(|(_, node)| matches!(node.kind, NodeKind::Use(_)))
        .count();
    let interpolators = scene
        .nodes()
        .filter(|(_, node)| node.kind.is_interpolator())
        .count();

    let rows = vec![
        ("Nodes", scene.len().to_string()),
        ("Named", scene.defs().count().to_string()),
        ("Shared (USE)", shared.to_string()),
        ("Interpolators", interpolators.to_string()),
        ("Routes", scene.routes().len().to_string()),
        (
            "Profile",
            if scene.is_animated() {
                "Full".to_string()
            } else {
                "Immersive".to_string()
            },
        ),
    ];
    print_kv_table(&mut out, "Scene Summary", &rows);
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "(unnamed)".to_string()
    } else {
        name.to_string()
    }
}

fn print_element_distribution(out: &mut impl Write, molecule: &Molecule) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, atom) in molecule.atoms() {
        *counts.entry(atom.symbol.as_str()).or_insert(0) += 1;
    }
    let total = molecule.atom_count();
    if total == 0 {
        return;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);
    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{left}{}{mid}{}{mid}{}{right}",
            INDENT,
            "─".repeat(name_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(dist_w + 2)
        )
    };

    let _ = writeln!(out, "{}┌─ Element Distribution ─┐", INDENT);
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Element", "Count", "Distribution"
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));
    for (symbol, count) in sorted.iter().take(15) {
        let pct = (*count as f64 / total as f64) * 100.0;
        let cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(symbol, name_w),
            count,
            cell
        );
    }
    if sorted.len() > 15 {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            "...",
            "...",
            format!("({} more elements)", sorted.len() - 15)
        );
    }
    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let filled = filled.min(max_width);
    format!("{}{}", "█".repeat(filled), "░".repeat(max_width - filled))
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let val_w = SAFE_TABLE_WIDTH
        .saturating_sub(key_w + 7)
        .min(
            rows.iter()
                .map(|(_, v)| v.chars().count())
                .max()
                .unwrap_or(0),
        );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{}┬{}┐",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    for (key, value) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            key,
            truncate(value, val_w)
        );
    }
    let _ = writeln!(
        out,
        "{}└{}┴{}┘",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    let _ = writeln!(out);
}
