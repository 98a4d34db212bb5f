//! ASCII DXF writer

use std::fmt::Write;

use super::{DxfPair, format_double};
use crate::document::{Drawing, Section};
use crate::entities::{COMMON_CODES, Entity};
use crate::xdata::{ExtendedData, XDataValue};

/// Render a drawing as DXF text.
pub fn write_dxf(drawing: &Drawing) -> String {
    let mut out = String::new();
    for section in &drawing.sections {
        match section {
            Section::Raw(pairs) if section.name() == Some("HEADER") => {
                write_pairs(&mut out, &with_handle_seed(pairs, drawing));
            }
            Section::Raw(pairs) => write_pairs(&mut out, pairs),
            Section::Entities => {
                write_pair(&mut out, &DxfPair::new(0, "SECTION"));
                write_pair(&mut out, &DxfPair::new(2, "ENTITIES"));
                for entity in drawing.entities() {
                    write_pairs(&mut out, &entity_pairs(entity));
                }
                write_pair(&mut out, &DxfPair::new(0, "ENDSEC"));
            }
        }
    }
    write_pair(&mut out, &DxfPair::new(0, "EOF"));
    out
}

fn write_pairs(out: &mut String, pairs: &[DxfPair]) {
    for pair in pairs {
        write_pair(out, pair);
    }
}

/// Group codes are right-aligned in a three character field.
fn write_pair(out: &mut String, pair: &DxfPair) {
    let _ = writeln!(out, "{:>3}", pair.code);
    let _ = writeln!(out, "{}", pair.value);
}

fn with_handle_seed(header: &[DxfPair], drawing: &Drawing) -> Vec<DxfPair> {
    let seed = DxfPair::handle(5, drawing.next_handle());
    let mut pairs = header.to_vec();
    match pairs.iter().position(|p| p.is(9, "$HANDSEED")) {
        Some(idx) if pairs.get(idx + 1).is_some_and(|p| p.code == 5) => pairs[idx + 1] = seed,
        Some(idx) => pairs.insert(idx + 1, seed),
        None => {
            let at = pairs.len().saturating_sub(1);
            pairs.insert(at, DxfPair::new(9, "$HANDSEED"));
            pairs.insert(at + 1, seed);
        }
    }
    pairs
}

/// Full pair sequence of one entity, including dependent records.
fn entity_pairs(entity: &Entity) -> Vec<DxfPair> {
    let common = entity.common();
    let (specific, grouped_codes, template) = entity.dxf_parts();
    let mut model = common.pairs();
    model.extend(specific);

    let source = common.source.as_ref().map(|s| s.body.as_slice()).unwrap_or(template.as_slice());

    let mut pairs = vec![DxfPair::new(0, entity.type_name())];
    pairs.extend(patch_body(source, &model, grouped_codes));
    pairs.extend(xdata_pairs(&common.extended_data));
    if let Some(source) = &common.source {
        pairs.extend(source.trailing.iter().cloned());
    }
    pairs
}

/// Merge modelled values into an existing pair sequence.
///
/// Each modelled value replaces the first occurrence of its group code;
/// later occurrences and unmodelled codes stay where they were. An owned
/// code with no modelled value (color reset to BYLAYER) is dropped. Values
/// the source has no slot for are inserted after the layer (common codes)
/// or appended (type-specific codes). Grouped codes are replaced as a block.
fn patch_body(source: &[DxfPair], model: &[DxfPair], grouped_codes: &[i32]) -> Vec<DxfPair> {
    let (grouped, singles): (Vec<&DxfPair>, Vec<&DxfPair>) =
        model.iter().partition(|p| grouped_codes.contains(&p.code));
    let in_source = |code: i32| source.iter().any(|p| p.code == code);
    let owned = |code: i32| COMMON_CODES.contains(&code) || singles.iter().any(|p| p.code == code);

    let mut used = vec![false; singles.len()];
    let mut seen_codes: Vec<i32> = Vec::new();
    let mut grouped_written = false;
    let mut out = Vec::with_capacity(source.len() + model.len());

    let take = |code: i32, used: &mut Vec<bool>, out: &mut Vec<DxfPair>| {
        if let Some(i) = (0..singles.len()).find(|&i| !used[i] && singles[i].code == code) {
            used[i] = true;
            out.push(singles[i].clone());
        }
    };

    if !in_source(5) {
        take(5, &mut used, &mut out);
    }

    for pair in source {
        if grouped_codes.contains(&pair.code) {
            if !grouped_written {
                out.extend(grouped.iter().map(|p| (*p).clone()));
                grouped_written = true;
            }
            continue;
        }
        if !owned(pair.code) || seen_codes.contains(&pair.code) {
            out.push(pair.clone());
            continue;
        }
        seen_codes.push(pair.code);
        take(pair.code, &mut used, &mut out);

        if pair.code == 8 {
            for code in [62, 6] {
                if !in_source(code) {
                    take(code, &mut used, &mut out);
                }
            }
        }
    }

    if !grouped_written {
        out.extend(grouped.iter().map(|p| (*p).clone()));
    }
    for (i, pair) in singles.iter().enumerate() {
        if !used[i] {
            out.push((*pair).clone());
        }
    }
    out
}

fn xdata_pairs(xdata: &ExtendedData) -> Vec<DxfPair> {
    let mut pairs = Vec::new();
    for record in xdata.records() {
        pairs.push(DxfPair::new(1001, &record.application_name));
        for value in &record.values {
            let text = match value {
                XDataValue::String(s) | XDataValue::ControlString(s) => s.clone(),
                XDataValue::Handle(h) => h.to_string(),
                XDataValue::Real(r) => format_double(*r),
                XDataValue::Integer16(i) => i.to_string(),
                XDataValue::Integer32(i) => i.to_string(),
                XDataValue::Raw { value, .. } => value.clone(),
            };
            pairs.push(DxfPair::new(value.code(), text));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(code: i32, value: &str) -> DxfPair {
        DxfPair::new(code, value)
    }

    #[test]
    fn pair_codes_are_right_aligned() {
        let mut out = String::new();
        write_pair(&mut out, &p(0, "LINE"));
        write_pair(&mut out, &p(62, "1"));
        write_pair(&mut out, &p(100, "AcDbEntity"));
        assert_eq!(out, "  0\nLINE\n 62\n1\n100\nAcDbEntity\n");
    }

    #[test]
    fn patch_keeps_unmodelled_codes_in_place() {
        let source = vec![p(5, "2A"), p(330, "1F"), p(8, "TEXT"), p(72, "1"), p(10, "1.0")];
        let model = vec![p(5, "2A"), p(8, "TITLE"), p(10, "5.0")];
        assert_eq!(
            patch_body(&source, &model, &[]),
            vec![p(5, "2A"), p(330, "1F"), p(8, "TITLE"), p(72, "1"), p(10, "5.0")]
        );
    }

    #[test]
    fn patch_inserts_missing_color_after_layer() {
        let source = vec![p(5, "2A"), p(8, "TEXT"), p(10, "1.0")];
        let model = vec![p(5, "2A"), p(8, "TEXT"), p(62, "1"), p(10, "1.0")];
        assert_eq!(
            patch_body(&source, &model, &[]),
            vec![p(5, "2A"), p(8, "TEXT"), p(62, "1"), p(10, "1.0")]
        );
    }

    #[test]
    fn patch_drops_color_reset_to_bylayer() {
        let source = vec![p(5, "2A"), p(8, "TEXT"), p(62, "3")];
        let model = vec![p(5, "2A"), p(8, "TEXT")];
        assert_eq!(
            patch_body(&source, &model, &[]),
            vec![p(5, "2A"), p(8, "TEXT")]
        );
    }

    #[test]
    fn patch_replaces_grouped_block_once() {
        let source = vec![
            p(8, "0"),
            p(90, "2"),
            p(10, "0.0"),
            p(20, "0.0"),
            p(10, "1.0"),
            p(20, "1.0"),
            p(210, "0.0"),
        ];
        let model = vec![p(8, "0"), p(90, "1"), p(10, "7.0"), p(20, "8.0")];
        assert_eq!(
            patch_body(&source, &model, &[10, 20]),
            vec![p(8, "0"), p(90, "1"), p(10, "7.0"), p(20, "8.0"), p(210, "0.0")]
        );
    }
}
