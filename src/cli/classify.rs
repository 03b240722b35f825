//! Classify command - prints the label the router would use for a prompt

use clap::Args;

use crate::config::AppConfig;
use crate::domain::{Classification, Classifier, Conversation, Message, RuleTableClassifier};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Prompt text; multiple words are joined with spaces
    #[arg(required = true)]
    pub text: Vec<String>,
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    let classifier = RuleTableClassifier::from_config(&config.classifier);
    let classification = classify(&classifier, &args.text.join(" "))?;

    println!("{}", describe(&classification));

    Ok(())
}

fn classify(classifier: &dyn Classifier, text: &str) -> anyhow::Result<Classification> {
    let conversation = Conversation::new(vec![Message::user(text)])?;
    Ok(classifier.classify(&conversation))
}

fn describe(classification: &Classification) -> String {
    match &classification.matched_rule {
        Some(rule) => format!("{} (rule: {})", classification.label, rule),
        None => format!("{} (no rule matched)", classification.label),
    }
}
