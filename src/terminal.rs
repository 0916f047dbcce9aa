//! Terminal host — drives a wizard from stdin for local testing.
//!
//! Commands:
//! - `<n>` picks (or toggles) option `n` of a choice step
//! - `/next`, `/back`
//! - `/other <text>`, `/consent`
//! - `/name <x>`, `/email <x>`
//! - `/code <x>` (a preset such as `+43`, or any code in manual mode), `/manual`
//! - `/quit`
//!
//! Any other text, digits included, fills the free-text body or the phone
//! number.

use std::fmt::Write as _;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::Result;
use crate::wizard::catalog::StepKind;
use crate::wizard::handlers::Interaction;
use crate::wizard::manager::{CompletionReport, DispatchOutcome, Navigator, WizardManager};
use crate::wizard::session::WizardSession;
use crate::wizard::view::{InputView, PRIVACY_CONSENT_LABEL, StepView, WizardView};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Other(String),
    Consent,
    Name(String),
    Email(String),
    Code(String),
    Manual,
    Text(String),
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Text(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim().to_string()),
        None => (rest, String::new()),
    };
    match name {
        "next" => Command::Next,
        "back" => Command::Back,
        "other" => Command::Other(arg),
        "consent" => Command::Consent,
        "name" => Command::Name(arg),
        "email" => Command::Email(arg),
        "code" => Command::Code(arg),
        "manual" => Command::Manual,
        "quit" | "exit" => Command::Quit,
        _ => Command::Text(line.to_string()),
    }
}

/// What the host loop does with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Interact(Interaction),
    Back,
    Quit,
}

/// Map a command onto the current step. `Err` carries a hint for the user.
pub fn resolve(command: Command, session: &WizardSession) -> std::result::Result<Action, String> {
    let step = session.current_step();
    let drafts = session.drafts();

    let interaction = match (command, &step.kind) {
        (Command::Quit, _) => return Ok(Action::Quit),
        (Command::Back, _) => return Ok(Action::Back),
        (Command::Next, _) => Interaction::Continue,

        (Command::Other(text), _) => Interaction::EditOtherText(text),
        (Command::Consent, StepKind::Phone) => {
            Interaction::SetWhatsAppConsent(!drafts.phone.whatsapp_consent)
        }
        (Command::Consent, _) => Interaction::SetPrivacyConsent(!drafts.step.privacy_accepted),
        (Command::Name(name), _) => Interaction::EditFirstName(name),
        (Command::Email(email), _) => Interaction::EditEmail(email),
        (Command::Code(code), _) => Interaction::SetCountryCode(code),
        (Command::Manual, _) => Interaction::ToggleManualCountryCode,

        (Command::Text(text), StepKind::FreeText { .. }) => Interaction::EditText(text),
        (Command::Text(text), StepKind::Phone) => Interaction::EditPhoneNumber(text),
        (Command::Text(_), StepKind::ContactVerification) => {
            return Err("Nutze /name <Vorname> und /email <Adresse>".to_string());
        }
        (Command::Text(text), kind) => {
            let option = text
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| kind.options().get(i))
                .ok_or_else(|| format!("Keine Option {text:?}, wähle per Nummer"))?
                .clone();
            match kind {
                StepKind::MultipleChoice { .. } => Interaction::ToggleOption(option),
                _ => Interaction::ChooseOption(option),
            }
        }
    };
    Ok(Action::Interact(interaction))
}

/// Plain-text rendering of a step.
pub fn render(view: &StepView) -> String {
    let mut out = String::new();
    if let Some(ref banner) = view.progress {
        let _ = writeln!(out, "[{} · {}% · {}]", banner.title, banner.percent, banner.caption);
    }
    let _ = writeln!(out, "({}/{}) {}", view.index + 1, view.step_count, view.question);
    if let Some(ref subtext) = view.subtext {
        let _ = writeln!(out, "    {subtext}");
    }

    match &view.input {
        InputView::Choice {
            options,
            multiple,
            min_label,
            max_label,
            other_text,
        } => {
            for (i, option) in options.iter().enumerate() {
                let mark = match (option.selected, *multiple) {
                    (true, true) => "[x]",
                    (false, true) => "[ ]",
                    (true, false) => "(•)",
                    (false, false) => "( )",
                };
                let _ = writeln!(out, "  {:>2}. {mark} {}", i + 1, option.label);
            }
            if min_label.is_some() || max_label.is_some() {
                let _ = writeln!(
                    out,
                    "      {} … {}",
                    min_label.as_deref().unwrap_or(""),
                    max_label.as_deref().unwrap_or("")
                );
            }
            if let Some(text) = other_text {
                let _ = writeln!(out, "  Sonstige: {text}");
            }
        }
        InputView::Text {
            text,
            privacy_accepted,
        } => {
            let _ = writeln!(out, "  Text: {text}");
            if let Some(accepted) = privacy_accepted {
                let mark = if *accepted { "[x]" } else { "[ ]" };
                let _ = writeln!(out, "  {mark} {PRIVACY_CONSENT_LABEL}");
            }
        }
        InputView::Contact { first_name, email } => {
            let _ = writeln!(out, "  Vorname: {first_name}");
            let _ = writeln!(out, "  E-Mail-Adresse: {email}");
        }
        InputView::Phone {
            presets,
            country_code,
            manual_code,
            number,
            whatsapp_consent,
        } => {
            if *manual_code {
                let _ = writeln!(out, "  Vorwahl (manuell): {country_code}");
            } else {
                for (i, preset) in presets.iter().enumerate() {
                    let mark = if preset.code == country_code { "(•)" } else { "( )" };
                    let _ = writeln!(out, "  {:>2}. {mark} {}", i + 1, preset.label);
                }
            }
            let _ = writeln!(out, "  Nummer: {number}");
            let mark = if *whatsapp_consent { "[x]" } else { "[ ]" };
            let _ = writeln!(out, "  {mark} Kontakt per WhatsApp");
        }
    }

    if let Some(ref error) = view.validation_error {
        let _ = writeln!(out, "  ! {error}");
    }
    if let Some(ref action) = view.action {
        let state = if action.enabled { "" } else { " (gesperrt)" };
        let _ = writeln!(out, "  → /next: {}{state}", action.label);
    }
    if view.show_back {
        let _ = writeln!(out, "  ← /back");
    }
    if let Some(footer) = view.footer {
        let _ = writeln!(out, "  {footer}");
    }
    out
}

/// Prints the redirect target instead of navigating.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, url: &str) {
        println!("\n→ Weiterleitung: {url}\n");
    }
}

fn print_view(manager: &WizardManager) {
    match manager.view() {
        WizardView::Step(view) => println!("\n{}", render(&view)),
        WizardView::ThankYou { title, message } => println!("\n{title}\n{message}\n"),
    }
    eprint!("> ");
}

/// Lines read from stdin, one item per line.
pub fn stdin_lines() -> impl Stream<Item = std::io::Result<String>> + Unpin {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    Box::pin(stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), lines)),
            Ok(None) => None, // EOF
            Err(e) => Some((Err(e), lines)),
        }
    }))
}

/// Read commands from stdin until the survey is submitted, `/quit`, or EOF.
pub async fn run(manager: WizardManager) -> Result<Option<CompletionReport>> {
    drive(manager, stdin_lines()).await
}

/// Feed input lines to the wizard. Returns the completion report, or `None`
/// when the visitor quit before submitting.
pub async fn drive<S>(
    mut manager: WizardManager,
    mut lines: S,
) -> Result<Option<CompletionReport>>
where
    S: Stream<Item = std::io::Result<String>> + Unpin,
{
    print_view(&manager);

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                return Err(e.into());
            }
        };
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        let action = match resolve(parse_command(&line), manager.session()) {
            Ok(action) => action,
            Err(hint) => {
                println!("  {hint}");
                eprint!("> ");
                continue;
            }
        };

        let result = match action {
            Action::Quit => break,
            Action::Back => manager.back().map(DispatchOutcome::Pending),
            Action::Interact(interaction) => manager.dispatch(interaction).await,
        };

        match result {
            Ok(DispatchOutcome::Redirected(report)) => {
                tracing::info!(
                    destination = %report.destination,
                    delivered = report.delivered,
                    "Survey finished"
                );
                return Ok(Some(report));
            }
            Ok(DispatchOutcome::Pending(_)) => {}
            Err(e) => println!("  {e}"),
        }
        print_view(&manager);
    }

    tracing::info!(session = %manager.session().id(), "Survey aborted");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::wizard::catalog::{HostContext, StepCatalog, step_ids};

    fn session_at(id: u32) -> WizardSession {
        let mut s = WizardSession::new(
            Arc::new(StepCatalog::funnel_default()),
            HostContext::Standalone,
            None,
        );
        while s.current_step().id != id {
            s.advance().unwrap();
        }
        s
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command(" 3 "), Command::Text("3".into()));
        assert_eq!(parse_command("01511234567"), Command::Text("01511234567".into()));
        assert_eq!(parse_command("/next"), Command::Next);
        assert_eq!(parse_command("/other  Gicht und Rheuma"), Command::Other("Gicht und Rheuma".into()));
        assert_eq!(parse_command("/email a@b.de"), Command::Email("a@b.de".into()));
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("abends ab 18 Uhr"), Command::Text("abends ab 18 Uhr".into()));
        assert_eq!(parse_command("/unbekannt"), Command::Text("/unbekannt".into()));
    }

    #[test]
    fn picks_map_to_step_kind() {
        let pick = |line: &str, session: &WizardSession| resolve(parse_command(line), session);

        let multi = session_at(step_ids::CHALLENGE);
        let first = multi.current_step().options()[0].clone();
        assert_eq!(
            pick("1", &multi),
            Ok(Action::Interact(Interaction::ToggleOption(first)))
        );
        assert!(pick("0", &multi).is_err());
        assert!(pick("6", &multi).is_err());
        assert!(pick("viel", &multi).is_err());

        let single = session_at(step_ids::EATING_DISORDER);
        assert_eq!(
            pick("2", &single),
            Ok(Action::Interact(Interaction::ChooseOption("Nein".into())))
        );

        let phone = session_at(step_ids::PHONE);
        assert_eq!(
            pick("/code +43", &phone),
            Ok(Action::Interact(Interaction::SetCountryCode("+43".into())))
        );
    }

    #[test]
    fn digits_fill_text_and_phone_fields() {
        let phone = session_at(step_ids::PHONE);
        assert_eq!(
            resolve(parse_command("12"), &phone),
            Ok(Action::Interact(Interaction::EditPhoneNumber("12".into())))
        );
        assert_eq!(
            resolve(parse_command("2"), &phone),
            Ok(Action::Interact(Interaction::EditPhoneNumber("2".into())))
        );

        let last = session_at(step_ids::AVAILABILITY);
        assert_eq!(
            resolve(parse_command("18"), &last),
            Ok(Action::Interact(Interaction::EditText("18".into())))
        );
        assert_eq!(
            resolve(parse_command("07"), &last),
            Ok(Action::Interact(Interaction::EditText("07".into())))
        );
    }

    #[tokio::test]
    async fn short_phone_number_stays_blocked_without_message() {
        let mut manager = manager();
        while manager.session().current_step().id != step_ids::PHONE {
            manager.advance().await.unwrap();
        }

        for line in ["12", "/next"] {
            let Action::Interact(interaction) =
                resolve(parse_command(line), manager.session()).unwrap()
            else {
                panic!("expected an interaction for {line:?}");
            };
            manager.dispatch(interaction).await.unwrap();
        }

        let session = manager.session();
        assert_eq!(session.current_step().id, step_ids::PHONE);
        assert_eq!(session.drafts().step.phone_number, "12");
        assert!(!session.can_continue());
        assert!(session.validation_error().is_none());
    }

    #[test]
    fn consent_and_text_follow_the_step() {
        let phone = session_at(step_ids::PHONE);
        assert_eq!(
            resolve(Command::Consent, &phone),
            Ok(Action::Interact(Interaction::SetWhatsAppConsent(true)))
        );
        assert_eq!(
            resolve(Command::Text("0151 123".into()), &phone),
            Ok(Action::Interact(Interaction::EditPhoneNumber("0151 123".into())))
        );

        let last = session_at(step_ids::AVAILABILITY);
        assert_eq!(
            resolve(Command::Consent, &last),
            Ok(Action::Interact(Interaction::SetPrivacyConsent(true)))
        );

        let contact = session_at(step_ids::CONTACT);
        assert!(resolve(Command::Text("Anna".into()), &contact).is_err());
        assert_eq!(resolve(Command::Back, &contact), Ok(Action::Back));
    }

    #[test]
    fn render_marks_last_step() {
        let s = session_at(step_ids::AVAILABILITY);
        let WizardView::Step(view) = WizardView::of(&s) else {
            panic!("expected step view");
        };
        let text = render(&view);
        assert!(text.contains("Fast geschafft"));
        assert!(text.contains("(9/9)"));
        assert!(text.contains("Absenden (gesperrt)"));
        assert!(text.contains(PRIVACY_CONSENT_LABEL));
    }

    struct SilentNavigator;

    impl Navigator for SilentNavigator {
        fn redirect(&self, _url: &str) {}
    }

    fn manager() -> WizardManager {
        let catalog = Arc::new(StepCatalog::funnel_default());
        let deps = crate::wizard::manager::WizardDeps {
            budget_rule: crate::wizard::policy::BudgetRule::funnel_default(&catalog).unwrap(),
            catalog,
            targets: crate::wizard::policy::RedirectTargets::default(),
            event_name: "SURVEY_SUBMIT".to_string(),
            transport: Arc::new(crate::transport::DisabledTransport),
            navigator: Arc::new(SilentNavigator),
        };
        WizardManager::new(deps, HostContext::Standalone, None)
    }

    fn script(lines: &[&str]) -> impl Stream<Item = std::io::Result<String>> + Unpin {
        stream::iter(
            lines
                .iter()
                .map(|l| Ok(l.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn scripted_session_submits() {
        let report = drive(
            manager(),
            script(&[
                "1", "/next", "", "2", "/next", "9", "2", "5", "/other Gicht", "/next", "4",
                "/name Anna", "/email anna@example.de", "/next", "/consent", "0151 1234567",
                "/next", "Abends", "/consent", "/next",
            ]),
        )
        .await
        .unwrap()
        .expect("survey should be submitted");

        assert!(!report.disqualified);
        assert!(!report.delivered);
        assert_eq!(report.payload.situation_rating, "9");
        assert_eq!(report.payload.budget, "Zwischen 150 und 250 € ☑️");
        assert_eq!(report.payload.phone, "+49 0151 1234567");
        assert!(report.payload.whatsapp_consent);
        assert_eq!(report.payload.raw_answers.other_text(5), Some("Gicht"));
    }

    #[tokio::test]
    async fn quit_and_eof_abort() {
        assert!(drive(manager(), script(&["1", "/quit", "/next"])).await.unwrap().is_none());
        assert!(drive(manager(), script(&["hallo", "/back"])).await.unwrap().is_none());
    }
}
