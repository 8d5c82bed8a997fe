use super::*;

pub(super) fn remove_definitions_by_model(entries: &mut [LexicalEntry], model: &str) -> usize {
    let mut removed = 0usize;
    for entry in entries.iter_mut() {
        for sense in entry.senses.iter_mut() {
            let count = sense.remove_ai_definitions_by(model);
            if count > 0 {
                info!(usem = %sense.usem, model = %model, "removed generated definition");
                removed += count;
            }
        }
    }
    removed
}
