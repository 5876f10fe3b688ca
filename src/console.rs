//! Text front-end: one command per line on stdin.

use std::io::Write;

use clap::{Args, Parser, error::ErrorKind};
use sport::{
  Error,
  entity::Role,
  prelude::Date,
  state::AppState,
  sv::{ClientCard, Session, SubscriptionView},
  utils,
  validate::format_phone_for_display,
  workflow::{ClientDraft, Mode},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[derive(Parser, Debug)]
#[command(multicall = true)]
enum Command {
  /// Sign in with a staff account
  Login { login: String, password: String },
  /// End the current session
  Logout,
  /// Show all clients
  List {
    #[arg(long)]
    json: bool,
  },
  /// Find clients by any part of the name or by phone digits
  Search {
    #[arg(required = true)]
    text: Vec<String>,
    #[arg(long)]
    json: bool,
  },
  /// Show subscription plans
  Types,
  /// Show one client with all of its subscriptions
  Show {
    id: i32,
    #[arg(long)]
    json: bool,
  },
  /// Register a new client
  Add(ClientArgs),
  /// Change a client; --plan starts or renews the subscription
  Edit {
    id: i32,
    #[command(flatten)]
    fields: ClientArgs,
  },
  /// Remove a client together with its subscriptions
  Delete {
    id: i32,
    #[arg(long)]
    yes: bool,
  },
  /// Render a phone number the way the client form shows it
  FormatPhone { text: Vec<String> },
  /// Leave the console
  #[command(alias = "exit")]
  Quit,
}

/// Form fields. Omitted ones stay empty on `add` and unchanged on `edit`.
#[derive(Args, Debug)]
struct ClientArgs {
  #[arg(long)]
  last: Option<String>,
  #[arg(long)]
  first: Option<String>,
  #[arg(long)]
  middle: Option<String>,
  /// Birth date, YYYY-MM-DD
  #[arg(long)]
  birth: Option<Date>,
  #[arg(long)]
  phone: Option<String>,
  /// Subscription plan id, see `types`
  #[arg(long)]
  plan: Option<i32>,
}

impl Command {
  /// Commands that change client records.
  fn is_mutation(&self) -> bool {
    matches!(self, Command::Add(_) | Command::Edit { .. } | Command::Delete { .. })
  }

  fn allowed_for(&self, role: Role) -> bool {
    !self.is_mutation() || role.can_manage_clients()
  }
}

impl ClientArgs {
  fn fill(self, mut draft: ClientDraft) -> (ClientDraft, Option<i32>) {
    if let Some(last) = self.last {
      draft.last_name = last;
    }
    if let Some(first) = self.first {
      draft.first_name = first;
    }
    if let Some(middle) = self.middle {
      draft.middle_name = middle;
    }
    if self.birth.is_some() {
      draft.birth_date = self.birth;
    }
    if let Some(phone) = self.phone {
      draft.phone = phone;
    }
    (draft, self.plan)
  }
}

enum Flow {
  Continue,
  Quit,
}

pub struct Console {
  app: AppState,
  session: Option<Session>,
}

impl Console {
  pub fn new(app: AppState) -> Self {
    Self { app, session: None }
  }

  pub async fn run(mut self) -> anyhow::Result<()> {
    println!("Sport complex client registry. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
      let who = self.session.as_ref().map_or("guest", |s| s.login.as_str());
      print!("{who}> ");
      std::io::stdout().flush()?;

      let Some(line) = lines.next_line().await? else {
        break;
      };
      let command = match parse_line(&line) {
        Ok(Some(command)) => command,
        Ok(None) => continue,
        Err(err) => {
          if let Err(io) = err.print() {
            eprintln!("Failed to print usage: {io}");
          }
          continue;
        }
      };

      match self.dispatch(command).await {
        Ok(Flow::Continue) => {}
        Ok(Flow::Quit) => break,
        Err(err) if err.is_validation() => println!("Rejected: {err}"),
        Err(err) => {
          error!("Command failed: {err}");
          println!("Error: {err}");
        }
      }
    }

    Ok(())
  }

  async fn dispatch(&mut self, command: Command) -> sport::Result<Flow> {
    match command {
      Command::Login { login, password } => {
        let session =
          self.app.sv().user.authenticate(&login, &password).await?;
        println!("Signed in as {} ({})", session.login, session.role);
        self.session = Some(session);
      }
      Command::Logout => {
        if self.session.take().is_some() {
          println!("Signed out");
        }
      }
      Command::FormatPhone { text } => {
        println!("{}", format_phone_for_display(&text.join("")));
      }
      Command::Quit => return Ok(Flow::Quit),
      command => {
        let Some(role) = self.session.as_ref().map(|s| s.role) else {
          println!("Sign in first: login <login> <password>");
          return Ok(Flow::Continue);
        };
        self.signed_in(role, command).await?;
      }
    }
    Ok(Flow::Continue)
  }

  async fn signed_in(&self, role: Role, command: Command) -> sport::Result<()> {
    if !command.allowed_for(role) {
      println!("The {role} role cannot change clients");
      return Ok(());
    }

    let sv = self.app.sv();
    let today = self.app.editor().today();

    match command {
      Command::List { json } => {
        let cards = sv.client.list(true).await?;
        print_cards(&cards, json, today);
      }
      Command::Search { text, json } => {
        let cards = sv.client.search(&text.join(" ")).await?;
        print_cards(&cards, json, today);
      }
      Command::Types => {
        for kind in sv.subscription_type.all().await? {
          println!(
            "{:>3}  {:<12} {} days",
            kind.subscription_type_id, kind.name, kind.duration_days
          );
        }
      }
      Command::Show { id, json } => {
        let client =
          sv.client.by_id(id).await?.ok_or(Error::ClientNotFound(id))?;
        let catalog = sv.subscription_type.catalog().await?;
        let subscriptions = sv
          .subscription
          .by_client(id)
          .await?
          .into_iter()
          .map(|subscription| SubscriptionView {
            kind: catalog.get(&subscription.subscription_type_id).cloned(),
            subscription,
          })
          .collect();
        print_card(&ClientCard { client, subscriptions }, json, today);
      }
      Command::Add(fields) => {
        self.save(None, fields).await?;
      }
      Command::Edit { id, fields } => {
        self.save(Some(id), fields).await?;
      }
      Command::Delete { id, yes } => {
        let client =
          sv.client.by_id(id).await?.ok_or(Error::ClientNotFound(id))?;
        if !yes {
          println!(
            "Delete client {}? Repeat with --yes to confirm.",
            client.full_name()
          );
          return Ok(());
        }
        self.app.editor().delete(id).await?;
        println!("Client deleted");
      }
      // answered before the session check
      Command::Login { .. }
      | Command::Logout
      | Command::FormatPhone { .. }
      | Command::Quit => {}
    }
    Ok(())
  }

  async fn save(&self, id: Option<i32>, fields: ClientArgs) -> sport::Result<()> {
    let editor = self.app.editor();

    let (mode, draft) = match id {
      Some(id) => {
        let (client, _) = editor.load(id).await?;
        (Mode::Edit(id), ClientDraft::from_client(&client))
      }
      None => (Mode::Create, ClientDraft::default()),
    };
    let (draft, plan) = fields.fill(draft);

    let kind = match plan {
      Some(plan) => {
        let Some(kind) = self.app.sv().subscription_type.by_id(plan).await?
        else {
          println!("No plan #{plan}, see `types`");
          return Ok(());
        };
        Some(kind)
      }
      None => None,
    };

    let client = editor.save(mode, &draft, kind.as_ref()).await?;
    match mode {
      Mode::Create => {
        println!("Client added: #{} {}", client.client_id, client.full_name())
      }
      Mode::Edit(_) => println!("Client updated: {}", client.full_name()),
    }
    Ok(())
  }
}

/// Splits a line shell-style, so quoted values may contain spaces.
fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
  let words = shlex::split(line).ok_or_else(|| {
    clap::Error::raw(ErrorKind::InvalidValue, "Unbalanced quotes\n")
  })?;
  if words.is_empty() {
    return Ok(None);
  }
  Command::try_parse_from(words).map(Some)
}

fn print_cards(cards: &[ClientCard], as_json: bool, today: Date) {
  if as_json {
    print_json(cards);
    return;
  }

  println!(
    "{:>4}  {:<36} {:<17} {:>3}  {:<10}  {}",
    "#", "Name", "Phone", "Age", "Registered", "Subscription"
  );
  for card in cards {
    let client = &card.client;
    println!(
      "{:>4}  {:<36} {:<17} {:>3}  {:<10}  {}",
      client.client_id,
      client.full_name(),
      format_phone_for_display(&client.phone),
      utils::age(client.birth_date, today),
      utils::format_date(client.registration_date),
      card.subscription_label()
    );
  }
  println!("{} client(s)", cards.len());
}

fn print_card(card: &ClientCard, as_json: bool, today: Date) {
  if as_json {
    print_json(card);
    return;
  }

  let client = &card.client;
  println!("#{} {}", client.client_id, client.full_name());
  println!(
    "  Born:       {} ({} y.o.)",
    utils::format_date(client.birth_date),
    utils::age(client.birth_date, today)
  );
  println!("  Phone:      {}", format_phone_for_display(&client.phone));
  println!("  Registered: {}", utils::format_date(client.registration_date));

  if card.subscriptions.is_empty() {
    println!("  {}", card.subscription_label());
  }
  for view in &card.subscriptions {
    let sub = &view.subscription;
    let name = view.kind.as_ref().map_or("?", |kind| kind.name.as_str());
    let left = if sub.is_active() {
      format!(", {} days left", utils::days_left(sub.end_date, today))
    } else {
      String::new()
    };
    println!(
      "  {:<12} {} - {} [{:?}{}]",
      name,
      utils::format_date(sub.start_date),
      utils::format_date(sub.end_date),
      sub.status,
      left
    );
  }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
  match json::to_string_pretty(value) {
    Ok(text) => println!("{text}"),
    Err(err) => println!("Error: {err}"),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn edit_keeps_omitted_fields() {
    let Command::Edit { id, fields } = Command::try_parse_from([
      "edit", "7", "--phone", "+79001112233", "--birth", "1990-05-17",
      "--plan", "2",
    ])
    .unwrap() else {
      panic!("expected edit");
    };
    assert_eq!(id, 7);

    let stored = ClientDraft {
      last_name: "Иванов".into(),
      first_name: "Пётр".into(),
      middle_name: "Сергеевич".into(),
      birth_date: None,
      phone: "+79991234567".into(),
    };
    let (draft, plan) = fields.fill(stored);

    assert_eq!(plan, Some(2));
    assert_eq!(draft.last_name, "Иванов");
    assert_eq!(draft.middle_name, "Сергеевич");
    assert_eq!(draft.phone, "+79001112233");
    assert_eq!(draft.birth_date, Date::from_ymd_opt(1990, 5, 17));
  }

  #[test]
  fn quoted_values_keep_spaces() {
    let Some(Command::Add(fields)) = parse_line(
      r#"add --last "Римский-Корсаков" --first "Анна Мария" --phone "+7 912 345 67 89""#,
    )
    .unwrap() else {
      panic!("expected add");
    };
    assert_eq!(fields.last.as_deref(), Some("Римский-Корсаков"));
    assert_eq!(fields.first.as_deref(), Some("Анна Мария"));
    assert_eq!(fields.phone.as_deref(), Some("+7 912 345 67 89"));

    assert!(matches!(parse_line("   "), Ok(None)));
    assert!(parse_line(r#"search "Иван"#).is_err());
  }

  #[test]
  fn managers_only_browse() {
    let add = parse_line("add --last Иванов").unwrap().unwrap();
    let edit = parse_line("edit 3 --phone +79991234567").unwrap().unwrap();
    let delete = parse_line("delete 3 --yes").unwrap().unwrap();
    let list = parse_line("list").unwrap().unwrap();
    let search = parse_line("search Иван").unwrap().unwrap();

    for command in [&add, &edit, &delete] {
      assert!(!command.allowed_for(Role::Manager));
      assert!(command.allowed_for(Role::Administrator));
    }
    for command in [&list, &search] {
      assert!(command.allowed_for(Role::Manager));
    }
  }

  #[test]
  fn rejects_malformed_birth_date() {
    assert!(Command::try_parse_from(["add", "--birth", "17.05.1990"]).is_err());
  }

  #[test]
  fn search_joins_words() {
    let Command::Search { text, json } =
      Command::try_parse_from(["search", "+7", "(912)", "--json"]).unwrap()
    else {
      panic!("expected search");
    };
    assert!(json);
    assert_eq!(text.join(" "), "+7 (912)");
  }
}
