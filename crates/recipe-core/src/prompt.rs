use crate::locale::Language;
use crate::validation::ValidIngredients;

/// Builds the single user message sent to the model.
pub fn build_prompt(ingredients: &ValidIngredients, language: Language) -> String {
    let template = match language {
        Language::En => ENGLISH_PROMPT,
        Language::De => GERMAN_PROMPT,
    };
    template.replace("{ingredients}", &ingredients.joined())
}

const ENGLISH_PROMPT: &str = r#"Generate exactly 4-5 unique and creative recipes using these 3 main ingredients: {ingredients}.

Consider the following criteria:
- Recipes should be anti-inflammatory and iodine-conscious (Hashimoto-friendly).
- Recipes should support fertility (e.g., through zinc, selenium, omega-3, folic acid).
- Recipes should have a mood-lifting and stress-reducing effect (e.g., tryptophan, magnesium, B vitamins, adaptogenic ingredients).
- Recipes should be antioxidant, gut-friendly, and cell-protective.
- Recipes should be gallbladder-friendly (easily digestible, not too high in fat, no extremely spicy or strongly bloating ingredients).
- Recipes should be cookable with natural, easily available everyday ingredients.
- No tomatoes, as they are not well tolerated.

For each recipe, provide:
- A creative and appetizing title
- A complete ingredients list (include the 3 main ingredients plus additional complementary ingredients)
- Step-by-step cooking instructions (be detailed and clear)
- Estimated cooking time (e.g., "30 minutes", "1 hour 15 minutes")
- Difficulty level (Easy, Medium, or Hard)
- A brief "healthBenefits" description (in English, 3-6 terms, comma-separated) summarizing key benefits such as stress-reducing, fertility-supporting, anti-inflammatory, anti-aging, gut-friendly

Please respond in JSON format with the following structure:
{
  "recipes": [
    {
      "title": "Recipe name",
      "ingredients": ["ingredient 1", "ingredient 2", "..."],
      "instructions": ["step 1", "step 2", "..."],
      "cookingTime": "time estimate",
      "difficulty": "Easy/Medium/Hard",
      "healthBenefits": "stress-reducing, fertility-supporting, anti-inflammatory"
    }
  ]
}

Make sure each recipe is unique, practical, and delicious. The recipes should be diverse in cooking methods and flavors. Respond with raw JSON only. Do not include code blocks, markdown, or any other formatting."#;

const GERMAN_PROMPT: &str = r#"Generiere genau 4-5 einzigartige und kreative Rezepte mit diesen 3 Hauptzutaten: {ingredients}.

Berücksichtige dabei folgende Kriterien:
- Rezepte sollen entzündungsarm und jodbewusst sein (Hashimoto-freundlich).
- Rezepte sollen die Fruchtbarkeit fördern (z. B. durch Zink, Selen, Omega-3, Folsäure).
- Rezepte sollen stimmungsaufhellend und stressreduzierend wirken (z. B. Tryptophan, Magnesium, B-Vitamine, adaptogene Zutaten).
- Rezepte sollen antioxidativ, darmfreundlich und zellschützend sein.
- Rezepte sollen gallefreundlich sein (leicht verdaulich, nicht zu fettreich, keine extrem scharfen oder stark blähenden Zutaten).
- Rezepte sollen mit natürlichen, leicht erhältlichen Zutaten aus dem Alltag kochbar sein.
- Keine Tomaten, da diese nicht verträglich sind.

Für jedes Rezept stelle folgendes bereit:
- Einen kreativen und appetitlichen Titel
- Eine vollständige Zutatenliste (schließe die 3 Hauptzutaten plus zusätzliche ergänzende Zutaten ein)
- Schritt-für-Schritt Kochanweisungen (detailliert und klar)
- Geschätzte Kochzeit (z.B., "30 Minuten", "1 Stunde 15 Minuten")
- Schwierigkeitsgrad (Einfach, Mittel, oder Schwer)
- Eine kurze Beschreibung der "healthBenefits" (auf Englisch, 3-6 Begriffe, komma-getrennt), die die wichtigsten Gesundheitsvorteile zusammenfasst (z. B. stressreduzierend, fruchtbarkeitsfördernd, anti-entzündlich, anti-aging, darmfreundlich)

Bitte antworte im JSON-Format mit der folgenden Struktur:
{
  "recipes": [
    {
      "title": "Rezeptname",
      "ingredients": ["Zutat 1", "Zutat 2", "..."],
      "instructions": ["Schritt 1", "Schritt 2", "..."],
      "cookingTime": "Zeitschätzung",
      "difficulty": "Einfach/Mittel/Schwer",
      "healthBenefits": "stress-reducing, fertility-supporting, anti-inflammatory"
    }
  ]
}

Stelle sicher, dass jedes Rezept einzigartig, praktisch und köstlich ist. Die Rezepte sollten vielfältig in Kochmethoden und Geschmäckern sein. Antworte nur mit reinem JSON. Füge keine Codeblöcke, Markdown oder andere Formatierung hinzu."#;

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredients() -> ValidIngredients {
        ValidIngredients::new(["milk", "flour", "eggs"]).expect("valid")
    }

    #[test]
    fn german_prompt_lists_ingredients() {
        let prompt = build_prompt(&ingredients(), Language::De);
        assert!(prompt.starts_with("Generiere genau 4-5"));
        assert!(prompt.contains("Hauptzutaten: milk, flour, eggs."));
        assert!(!prompt.contains("{ingredients}"));
    }

    #[test]
    fn english_prompt_requests_raw_json() {
        let prompt = build_prompt(&ingredients(), Language::En);
        assert!(prompt.contains("ingredients: milk, flour, eggs."));
        assert!(prompt.contains("\"recipes\": ["));
        assert!(prompt.ends_with("any other formatting."));
    }
}
