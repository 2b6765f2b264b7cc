//! End-to-end behaviour of entities with state fields: defaults on creation,
//! transition graphs, custom transitions with services, and query filters.

use entity_states::builder::{ConfigViolation, StateConfig, StateConfigDef, TransitionBuilder};
use entity_states::core::State;
use entity_states::effects::{FromEntity, Services, Transition, TransitionError};
use entity_states::entity::{cast, FilterMode, Field, HasStates, StateFields};
use entity_states::registry::{self, StateError};
use entity_states::state_enum;
use pretty_assertions::assert_eq;
use std::sync::Mutex;

state_enum! {
    pub enum Letter {
        A = "A",
        B = "B",
        C = "C",
        D = "D",
    }
    config: StateConfig::new()
        .default_state(Letter::A)
        .allow_transitions(Letter::A, [Letter::B, Letter::C, Letter::D])
        .terminal(Letter::C)
}

#[derive(Debug, Default)]
pub struct Document {
    pub id: u32,
    pub stage: Option<Letter>,
}

const STAGE: Field<Document, Letter> = Field::new("stage", |d| &d.stage, |d| &mut d.stage);

impl HasStates for Document {
    fn state_fields() -> StateFields<Self> {
        StateFields::new().field(STAGE)
    }

    fn entity_key(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[test]
fn letter_family_graph() {
    let document = Document::default();
    let a = STAGE.make(Letter::A, &document).unwrap();
    let b = STAGE.make("B", &document).unwrap();

    assert_eq!(a.transitionable_states(), vec!["B", "C", "D"]);
    assert!(!b.can_transition_to(Letter::A));
    assert_eq!(Letter::resolve("C").unwrap(), Letter::C);
    assert_eq!(Letter::resolve(3_usize).unwrap(), Letter::C);
    assert!(Letter::C.transitionable_states().is_empty());
}

#[test]
fn unset_field_gets_the_default_on_creation() {
    let document = Document::default().with_default_states().unwrap();
    assert!(STAGE.state(&document).unwrap().equals(Letter::A));
}

#[test]
fn explicit_value_is_kept_on_creation() {
    let document = Document {
        id: 1,
        stage: Some(Letter::C),
    }
    .with_default_states()
    .unwrap();

    let stage = STAGE.state(&document).unwrap();
    assert!(stage.equals(Letter::C));
    assert!(stage.transitionable_states().is_empty());
}

#[test]
fn entity_level_listings() {
    assert_eq!(Document::get_states_for("stage").unwrap(), vec!["A", "B", "C", "D"]);
    assert_eq!(
        Document::get_default_state_for("stage").unwrap(),
        Some("A".to_string())
    );
    assert_eq!(Document::get_states().unwrap().len(), 1);
}

#[test]
fn filters_translate_identifiers() {
    let filter = Document::where_state("stage", ["D", "Letter::B", "D", "Z"]).unwrap();
    assert_eq!(filter.values, vec!["B", "D"]);
    assert_eq!(filter.to_string(), "stage IN ('B', 'D')");

    let excluded = Document::where_not_state("stage", ["C"]).unwrap();
    assert_eq!(excluded.mode, FilterMode::NotIn);

    let stored = [Some("A"), Some("C"), None, Some("D")];
    let kept: Vec<_> = stored.iter().filter(|s| excluded.matches(**s)).collect();
    assert_eq!(kept, vec![&Some("A"), &Some("D")]);
}

#[test]
fn direct_transition_follows_the_graph() {
    let mut document = Document::default().with_default_states().unwrap();

    STAGE.transition_to(&mut document, "B").unwrap();
    let err = STAGE.transition_to(&mut document, "A").unwrap_err();

    assert!(err.is_guard_failure());
    assert_eq!(document.stage, Some(Letter::B));
    assert!(err.to_string().contains("Document(0)"));
}

#[test]
fn persisted_values_round_trip() {
    let mut document = Document::default();
    document.load_state("stage", Some("Letter::D")).unwrap();

    assert_eq!(cast::to_stored(&Letter::D), "D");
    assert_eq!(
        document.stored_states().unwrap(),
        vec![("stage".to_string(), Some("D".to_string()))]
    );
}

// Custom transitions with services

state_enum! {
    pub enum PaymentState {
        Pending,
        Paid,
        Failed,
        Refunded,
    }
    final: [Failed, Refunded]
    error: [Failed]
    config: StateConfig::new()
        .default_state(PaymentState::Pending)
        .allow_transitions(PaymentState::Pending, [PaymentState::Paid, PaymentState::Failed])
        .allow_transition(PaymentState::Paid, PaymentState::Refunded)
}

#[derive(Debug, Default)]
pub struct Payment {
    pub id: u32,
    pub amount_cents: u64,
    pub state: Option<PaymentState>,
    pub receipt: Option<String>,
}

const STATE: Field<Payment, PaymentState> = Field::new("state", |p| &p.state, |p| &mut p.state);

impl HasStates for Payment {
    fn state_fields() -> StateFields<Self> {
        StateFields::new().field(STATE)
    }

    fn entity_key(&self) -> Option<String> {
        Some(self.id.to_string())
    }
}

#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<String>>,
}

pub struct Capture {
    reference: String,
}

impl Transition<Payment> for Capture {
    type Output = String;
    type Deps<'s> = &'s Outbox;

    fn can_transition(&self, payment: &Payment) -> bool {
        payment.amount_cents > 0 && STATE.can_transition_to(payment, PaymentState::Paid)
    }

    fn handle(self, payment: &mut Payment, outbox: &Outbox) -> Result<String, TransitionError> {
        STATE.set(payment, PaymentState::Paid);
        payment.receipt = Some(self.reference.clone());
        outbox
            .sent
            .lock()
            .map_err(TransitionError::handler)?
            .push(format!("receipt {}", self.reference));
        Ok(self.reference)
    }
}

impl FromEntity<Payment> for Capture {
    type Args = &'static str;

    fn construct(payment: &Payment, prefix: &'static str) -> Self {
        Capture {
            reference: format!("{prefix}-{}", payment.id),
        }
    }
}

#[test]
fn custom_transition_uses_services() {
    let outbox = Outbox::default();
    let mut payment = Payment {
        id: 9,
        amount_cents: 500,
        ..Payment::default()
    }
    .with_default_states()
    .unwrap();
    let services = Services::new().with(outbox);

    let reference = payment
        .transition_with::<Capture>("rcpt", &services)
        .unwrap();

    assert_eq!(reference, "rcpt-9");
    assert_eq!(payment.state, Some(PaymentState::Paid));
    let outbox = services.get::<Outbox>().unwrap();
    assert_eq!(*outbox.sent.lock().unwrap(), vec!["receipt rcpt-9".to_string()]);
}

#[test]
fn custom_guard_rejects_without_side_effects() {
    let mut payment = Payment {
        id: 3,
        amount_cents: 0,
        ..Payment::default()
    }
    .with_default_states()
    .unwrap();
    let services = Services::new().with(Outbox::default());

    let err = payment
        .transition(Capture { reference: "x".to_string() }, &services)
        .unwrap_err();

    assert!(err.is_guard_failure());
    assert_eq!(payment.state, Some(PaymentState::Pending));
    assert_eq!(payment.receipt, None);
}

#[test]
fn missing_service_fails_before_the_handler() {
    let mut payment = Payment {
        id: 4,
        amount_cents: 100,
        ..Payment::default()
    }
    .with_default_states()
    .unwrap();

    let err = payment
        .transition(Capture { reference: "y".to_string() }, &Services::new())
        .unwrap_err();

    assert!(matches!(err, TransitionError::DependencyResolution { .. }));
    assert_eq!(payment.state, Some(PaymentState::Pending));
}

#[test]
fn closure_transition_on_entity() {
    let refund = TransitionBuilder::new()
        .named("refund")
        .when(|p: &Payment| STATE.can_transition_to(p, "refunded"))
        .handle(|p: &mut Payment| {
            STATE.set(p, PaymentState::Refunded);
            Ok(p.amount_cents)
        })
        .build()
        .unwrap();

    let mut paid = Payment {
        id: 5,
        amount_cents: 250,
        state: Some(PaymentState::Paid),
        receipt: None,
    };
    assert_eq!(paid.transition(refund.clone(), &Services::new()).unwrap(), 250);

    let mut pending = Payment::default().with_default_states().unwrap();
    assert!(pending.transition(refund, &Services::new()).is_err());
}

// Configuration errors

state_enum! {
    pub enum Broken {
        Open,
        Closed,
    }
    final: [Closed]
    config: StateConfig::new()
        .default_state(Broken::Open)
        .allow_transition(Broken::Closed, Broken::Open)
}

#[test]
fn invalid_graph_is_reported_with_every_violation() {
    let err = registry::graph::<Broken>().unwrap_err();
    match err {
        StateError::InvalidConfig { family, violations } => {
            assert_eq!(family, "Broken");
            assert_eq!(
                violations,
                vec![ConfigViolation::TransitionFromFinal {
                    from: "Broken::Closed".to_string(),
                    to: "Broken::Open".to_string(),
                }]
            );
        }
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }

    assert!(Broken::default_state().is_err());
    assert!(matches!(
        Broken::Open.try_transitionable_states(),
        Err(StateError::InvalidConfig { .. })
    ));
    assert!(matches!(
        Broken::Open.try_can_transition_to("closed"),
        Err(StateError::InvalidConfig { .. })
    ));
    // resolution only needs the mapping
    assert_eq!(Broken::resolve("closed").unwrap(), Broken::Closed);
}

#[derive(Debug)]
pub struct Valve {
    pub position: Option<Broken>,
}

const POSITION: Field<Valve, Broken> =
    Field::new("position", |v| &v.position, |v| &mut v.position);

impl HasStates for Valve {
    fn state_fields() -> StateFields<Self> {
        StateFields::new().field(POSITION)
    }
}

#[test]
fn transition_on_invalid_graph_is_a_config_error() {
    let mut valve = Valve {
        position: Some(Broken::Open),
    };

    let err = POSITION.transition_to(&mut valve, "closed").unwrap_err();

    assert!(matches!(
        err,
        TransitionError::State(StateError::InvalidConfig { family: "Broken", .. })
    ));
    assert!(!err.is_guard_failure());
    assert_eq!(valve.position, Some(Broken::Open));
}

state_enum! {
    pub enum Ticket {
        New,
        Assigned,
        Resolved,
    }
}

#[test]
fn json_config_replaces_the_graph() {
    assert!(Ticket::Resolved.can_transition_to("new"));

    let def = StateConfigDef::from_json(
        r#"{
            "default": "new",
            "transitions": { "new": ["assigned"], "assigned": ["Ticket::Resolved"] },
            "terminal": ["resolved"]
        }"#,
    )
    .unwrap();
    registry::replace_config::<Ticket>(StateConfig::from_def(&def).unwrap()).unwrap();

    assert_eq!(Ticket::default_state().unwrap(), Some(Ticket::New));
    assert_eq!(Ticket::New.transitionable_states(), vec!["assigned"]);
    assert!(!Ticket::Resolved.can_transition_to("new"));
}
