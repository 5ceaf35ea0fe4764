/// Case- and accent-insensitive comparison key for specialty labels and
/// weekday names, which are stored as free text ("Cardiología", "miércoles").
/// Used only for comparison, never for storage or display.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

// Latin diacritics seen in stored labels; everything else passes through.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(normalize("Médico"), "medico");
        assert_eq!(normalize("MEDICO"), "medico");
        assert_eq!(normalize("medico"), "medico");
        assert_eq!(normalize("Cardiología"), "cardiologia");
        assert_eq!(normalize("Miércoles"), "miercoles");
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(normalize("  Lunes  "), "lunes");
    }

    #[test]
    fn is_idempotent() {
        let once = normalize("  Niñez Temprana ");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
