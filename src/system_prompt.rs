//! Instruction text construction
//!
//! The active instruction sent to the tutor model is the topic brief loaded
//! from the prompt catalog plus a fixed technical directive that reserves
//! the `<nota>` marker pair for teaching asides. The directive is what makes
//! the split-panel UI work: everything inside the markers lands on the
//! grammar board, everything else in the chat column.

/// Fixed directive appended to every topic brief.
///
/// Keep the marker names here in sync with [`crate::annotation`].
const TECHNICAL_DIRECTIVE: &str = r"[INSTRUCCIÓN DEL SISTEMA]: Eres un tutor en una app de pantalla dividida.
IMPORTANTE: Si das una explicación gramatical, corrección o vocabulario clave, DEBES envolverlo en etiquetas <nota>...</nota>.
Ejemplo: 'Muy bien. <nota>Recuerda que ''casa'' es femenino.</nota> ¿Seguimos?'
El texto dentro de <nota> se mostrará en una pizarra separada. El resto va al chat.";

/// Fallback used when even the diagnostic-mode document is missing, so a
/// session always has a usable instruction.
const FALLBACK_BRIEF: &str = "Eres un tutor de español. Evalúa el nivel del estudiante mediante una conversación natural y adapta tu lenguaje a sus respuestas.";

/// Combine a topic brief with the technical directive.
pub fn build_instruction(brief: &str) -> String {
    format!("{}\n\n{TECHNICAL_DIRECTIVE}", brief.trim_end())
}

/// Instruction used when the diagnostic document cannot be resolved.
pub fn fallback_instruction() -> String {
    build_instruction(FALLBACK_BRIEF)
}
