//! Fixed instructions sent with every CV analysis request.
//!
//! The model is only asked to redact; its answer is not checked against these
//! rules.

pub const SYSTEM_PROMPT: &str = "Du bist ein Experte für die Analyse und Anonymisierung von Lebensläufen. \
Deine wichtigste Aufgabe ist es, ALLE personenbezogenen Daten korrekt zu anonymisieren, insbesondere den Namen der Person. \
Der Name darf NIRGENDS im Text erscheinen. Antworte auf Deutsch.";

const INSTRUCTIONS: &str = r#"Analysiere diesen Lebenslauf und extrahiere die folgenden Informationen. Befolge dabei STRIKT diese Anonymisierungsregeln:

1. Persönliche Informationen:
   - Der Name MUSS IMMER durch [NAME] ersetzt werden
   - Adresse:
     * Straße und Hausnummer durch [STRASSE] ersetzen
     * PLZ und Stadt bleiben sichtbar (Beispiel: "[STRASSE], 12345 München")
   - E-Mail-Adresse durch [EMAIL] ersetzen
   - Telefonnummer durch [TELEFON] ersetzen
   - Geburtsdatum durch [GEBURTSDATUM] ersetzen
   - WICHTIG: Der Name darf NIRGENDS im Text erscheinen, auch nicht in Berufserfahrung oder Ausbildung

2. Ausbildung:
   - Bildungseinrichtungen (Name der Schule/Universität beibehalten)
   - Abschlüsse
   - Zeiträume
   - Noten (falls vorhanden)

3. Berufserfahrung:
   - Unternehmen
   - Position/Rolle
   - Zeitraum
   - Hauptaufgaben und Verantwortlichkeiten

4. Fähigkeiten:
   - Technische Kompetenzen
   - Soft Skills
   - Software-Kenntnisse

5. Sprachen:
   - Sprache und Niveau

6. Zertifizierungen:
   - Name der Zertifizierung
   - Ausstellungsdatum

WICHTIGE ANWEISUNGEN:
- Der Name der Person MUSS ÜBERALL durch [NAME] ersetzt werden
- Stelle sicher, dass der Name auch in Formulierungen wie "Herr/Frau [Nachname]" oder in Projektbeschreibungen durch [NAME] ersetzt wird
- Bei der Adresse nur Straße und Hausnummer durch [STRASSE] ersetzen, PLZ und Stadt bleiben sichtbar
- Formatiere die Ausgabe übersichtlich mit Überschriften und Aufzählungszeichen

Lebenslauf Text:
"#;

/// User message: the redaction rules followed by the CV text.
pub fn user_prompt(cv_text: &str) -> String {
    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + cv_text.len());
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str(cv_text);
    prompt
}
