use super::LineReader;
use super::columns::Columns;
use super::mol;
use crate::io::error::Error;
use crate::model::geom::Vector;
use crate::model::molecule::{Molecule, Reaction};
use log::{debug, warn};
use std::io::BufRead;

pub const RXN_MARKER: &str = "$RXN";
pub const MOL_MARKER: &str = "$MOL";
pub const END_MARKER: &str = "M  END";

/// Participant counts of a rxnfile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionCounts {
    pub reactants: usize,
    pub products: usize,
}

pub fn parse_counts_line(line: &str, line_no: usize) -> Result<ReactionCounts, Error> {
    let cols = Columns::new(line, line_no);
    cols.require_width(mol::MIN_COUNTS_WIDTH, "reaction counts line")?;
    Ok(ReactionCounts {
        reactants: cols.uint(0..3, "reactant count")? as usize,
        products: cols.uint(3..6, "product count")? as usize,
    })
}

/// Reads the four-line rxnfile header and returns the reaction name.
pub fn parse_header<R: BufRead>(lines: &mut LineReader<R>) -> Result<String, Error> {
    let marker = lines.next_line("the $RXN marker")?;
    if !marker.starts_with(RXN_MARKER) {
        return Err(Error::format(
            lines.line_no(),
            &marker,
            format!("expected '{RXN_MARKER}' marker"),
        ));
    }
    if marker.contains("V3000") {
        return Err(Error::format(
            lines.line_no(),
            &marker,
            "V3000 reaction files are not supported",
        ));
    }
    let name = lines.next_line("the reaction name")?.trim().to_string();
    lines.next_line("the reaction program line")?;
    lines.next_line("the reaction comment line")?;
    Ok(name)
}

/// Reads a whole rxnfile: header, counts and both participant groups.
pub fn parse_rxn<R: BufRead>(lines: &mut LineReader<R>, spacing: f64) -> Result<Reaction, Error> {
    let name = parse_header(lines)?;
    let counts_line = lines.next_line("the reaction counts line")?;
    let counts = parse_counts_line(&counts_line, lines.line_no())?;

    let reactants = parse_participants(lines, counts.reactants, spacing, "reactant")?;
    let products = parse_participants(lines, counts.products, spacing, "product")?;

    Ok(Reaction {
        name,
        reactants,
        products,
    })
}

/// Reads `count` molfile blocks and lays them out left to right.
///
/// Each block after the first is moved along x so that its left edge sits
/// `spacing` past the right edge of what is already placed, then merged.
pub fn parse_participants<R: BufRead>(
    lines: &mut LineReader<R>,
    count: usize,
    spacing: f64,
    role: &str,
) -> Result<Molecule, Error> {
    let mut group: Option<Molecule> = None;
    for i in 0..count {
        let marker = lines.next_line(&format!("{role} {} of {count}", i + 1))?;
        let marker_line = lines.line_no();
        if !marker.starts_with(MOL_MARKER) {
            return Err(Error::format(
                marker_line,
                &marker,
                format!("expected '{MOL_MARKER}' marker before {role} {}", i + 1),
            ));
        }

        let mut participant = mol::parse_mol(lines)?;
        skip_properties(lines)?;

        match group.as_mut() {
            None => {
                debug!("{role} {} placed at {}", i + 1, participant.middle());
                group = Some(participant);
            }
            Some(placed) => {
                let shift = placed.max_x() + spacing + participant.width() / 2.0;
                participant.translate(Vector::along_x(shift));
                debug!("{role} {} placed at {}", i + 1, participant.middle());
                placed.add_all(participant).map_err(|e| {
                    Error::format(marker_line, &marker, format!("{role} {}: {e}", i + 1))
                })?;
            }
        }
    }

    Ok(group.unwrap_or_else(|| {
        warn!("reaction has no {role}s");
        Molecule::default()
    }))
}

fn skip_properties<R: BufRead>(lines: &mut LineReader<R>) -> Result<(), Error> {
    loop {
        let line = lines.next_line(&format!("'{END_MARKER}'"))?;
        if line.starts_with(END_MARKER) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geom::Point;
    use std::io::Cursor;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn reader(text: &str) -> LineReader<Cursor<String>> {
        LineReader::new(Cursor::new(text.to_string()))
    }

    fn single_atom(symbol: &str, aam: u32) -> String {
        format!(
            "$MOL\n{symbol}\n  test\n\n  1  0  0  0  0  0            999 V2000\n    \
             3.0000    1.0000    0.0000 {symbol:<3} 0  0  0  0  0  0  0  0  0{aam:>3}  0  0\n\
             M  CHG  1   1   0\nM  END\n"
        )
    }

    fn diatomic(aam: (u32, u32), x2: f64) -> String {
        format!(
            "$MOL\ndiatomic\n  test\n\n  2  1  0  0  0  0            999 V2000\n    \
             0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0{:>3}  0  0\n\
             {x2:>10.4}    0.0000    0.0000 O   0  0  0  0  0  0  0  0  0{:>3}  0  0\n\
             \x20 1  2  2  0  0  0  0\nM  END\n",
            aam.0, aam.1
        )
    }

    #[test]
    fn counts_line_reads_participant_counts() {
        let counts = parse_counts_line("  2  1", 5).unwrap();
        assert_eq!(
            counts,
            ReactionCounts {
                reactants: 2,
                products: 1
            }
        );
        assert!(parse_counts_line("  2", 5).is_err());
    }

    #[test]
    fn header_requires_rxn_marker() {
        let err = parse_header(&mut reader("$MOL\nname\n\n\n")).unwrap_err();
        assert_eq!(err.line(), Some(1));
        let err = parse_header(&mut reader("$RXN V3000\nname\n\n\n")).unwrap_err();
        assert!(err.to_string().contains("V3000"));
        let name = parse_header(&mut reader("$RXN\n  esterification \n\n\n")).unwrap();
        assert_eq!(name, "esterification");
    }

    #[test]
    fn participants_are_laid_out_left_to_right() {
        let text = format!("{}{}", single_atom("C", 1), single_atom("O", 2));
        let spacing = 2.0;
        let group = parse_participants(&mut reader(&text), 2, spacing, "reactant").unwrap();

        // each participant is centered on parse, so the first atom sits at the origin
        let first = group.atom(1).unwrap().position;
        assert_eq!(first, Point::ORIGIN);
        let second = group.atom(2).unwrap().position;
        let second_half_width = 0.0;
        assert!(approx_eq(second.x, first.x + spacing + second_half_width, 1e-12));
        assert_eq!(second.y, 0.0);
    }

    #[test]
    fn wide_participants_do_not_overlap() {
        let text = format!("{}{}", diatomic((1, 2), 2.0), diatomic((3, 4), 4.0));
        let group = parse_participants(&mut reader(&text), 2, 1.5, "product").unwrap();
        // first spans [-1, 1]; second is 4 wide, so its center lands at 1 + 1.5 + 2
        let c3 = group.atom(3).unwrap().position;
        let o4 = group.atom(4).unwrap().position;
        assert!(approx_eq(c3.x, 2.5, 1e-12));
        assert!(approx_eq(o4.x, 6.5, 1e-12));
        assert!(approx_eq(Point::midpoint(c3, o4).x, 4.5, 1e-12));
        assert_eq!(group.bond_count(), 2);
    }

    #[test]
    fn missing_mol_marker_is_rejected() {
        let text = single_atom("C", 1).replacen("$MOL", "$MOX", 1);
        let err = parse_participants(&mut reader(&text), 1, 2.0, "reactant").unwrap_err();
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn missing_end_marker_is_rejected() {
        let text = single_atom("C", 1).replace("M  END\n", "");
        let err = parse_participants(&mut reader(&text), 1, 2.0, "reactant").unwrap_err();
        assert!(err.to_string().contains("M  END"));
    }

    #[test]
    fn fewer_participants_than_counted_is_rejected() {
        let text = format!("$RXN\nr\n\n\n  2  1\n{}", single_atom("C", 1));
        let err = parse_rxn(&mut reader(&text), 2.0).unwrap_err();
        assert!(err.to_string().contains("reactant 2 of 2"));
    }

    #[test]
    fn colliding_mapping_numbers_across_participants_are_rejected() {
        let text = format!("{}{}", single_atom("C", 1), single_atom("O", 1));
        let err = parse_participants(&mut reader(&text), 2, 2.0, "reactant").unwrap_err();
        assert!(err.to_string().contains("duplicate atom key 1"));
    }

    #[test]
    fn reaction_with_no_products_has_empty_product_molecule() {
        let text = format!("$RXN\nr\n\n\n  1  0\n{}", single_atom("C", 1));
        let reaction = parse_rxn(&mut reader(&text), 2.0).unwrap();
        assert_eq!(reaction.reactants.atom_count(), 1);
        assert!(reaction.products.is_empty());
    }

    #[test]
    fn full_reaction_pairs_mapped_atoms() {
        let text = format!(
            "$RXN\nswap\n  tool\n\n  1  1\n{}{}",
            diatomic((1, 2), 1.0),
            diatomic((2, 1), 1.0)
        );
        let reaction = parse_rxn(&mut reader(&text), 2.0).unwrap();
        assert_eq!(reaction.name, "swap");
        assert_eq!(reaction.reactants.atom(1).unwrap().symbol, "C");
        assert_eq!(reaction.products.atom(1).unwrap().symbol, "O");
        assert!(reaction.products.bond((1, 2)).is_some());
    }
}
