//! End-to-end use of the editor as a library: a host owns the list, feeds
//! each persisted proposal back in, and writes the result to a record file.

use std::fs;
use std::sync::mpsc::Receiver;

use multifield::editor::{
    DismissEvent, EditorHooks, MultiItemController, SubmitOutcome, Validation, validate,
};
use multifield::io::record_io::RecordFile;
use multifield::model::{FieldValue, LinkRecord};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Host that applies every proposal, like a store that always accepts
struct Host<T> {
    items: Vec<T>,
    proposals: Receiver<Vec<T>>,
}

impl<T> Host<T> {
    fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(items) = self.proposals.try_recv() {
            self.items = items;
            applied += 1;
        }
        applied
    }
}

fn email_editor(items: Vec<String>) -> (MultiItemController<String>, Host<String>) {
    let (hooks, proposals) = EditorHooks::channel();
    let controller = MultiItemController::new(hooks.with_validator(validate::email));
    (controller, Host { items, proposals })
}

#[test]
fn host_round_trip_through_a_record_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("acme.toml");
    fs::write(
        &path,
        "[record]\nname = \"Acme\"\n\n[fields.emails]\nkind = \"emails\"\nitems = []\n",
    )
    .unwrap();

    let (mut editor, mut host) = email_editor(Vec::new());

    // empty list: typing goes straight into the inline input
    assert!(editor.shows_input(&host.items));
    editor.update_text(&host.items, "ceo@acme.test");
    assert_eq!(editor.submit(&host.items).unwrap(), SubmitOutcome::Persisted);
    assert_eq!(host.sync(), 1);

    editor.start_add();
    editor.update_text(&host.items, "sales@acme.test");
    editor.submit(&host.items).unwrap();
    host.sync();

    editor.set_primary(&host.items, 1).unwrap();
    host.sync();
    assert_eq!(host.items, vec!["sales@acme.test", "ceo@acme.test"]);

    let mut file = RecordFile::load(&path).unwrap();
    file.set_field("emails", FieldValue::Emails(host.items.clone()))
        .unwrap();
    file.save().unwrap();

    let reloaded = RecordFile::load(&path).unwrap();
    assert_eq!(
        reloaded.record.field("emails"),
        Some(&FieldValue::Emails(host.items.clone()))
    );
}

#[test]
fn rejected_proposals_leave_the_host_list_alone() {
    let (mut editor, mut host) = email_editor(vec!["a@acme.test".into()]);
    editor.start_edit(&host.items, 0).unwrap();
    editor.update_text(&host.items, "broken");
    assert_eq!(editor.submit(&host.items).unwrap(), SubmitOutcome::Invalid);
    assert_eq!(host.sync(), 0);
    assert_eq!(editor.error_message(), Some("Invalid email address: broken"));

    // host never applies a proposal: the editor keeps working off the stale list
    editor.update_text(&host.items, "b@acme.test");
    editor.submit(&host.items).unwrap();
    let _unapplied = host.proposals.try_recv().unwrap();
    assert_eq!(host.items, vec!["a@acme.test"]);
    assert!(!editor.is_open());
}

#[test]
fn dismissal_on_an_empty_list_submits_once() {
    let (hooks, proposals) = EditorHooks::<LinkRecord>::channel();
    let mut editor = MultiItemController::new(hooks.with_validator(validate::url));
    let mut host = Host {
        items: Vec::new(),
        proposals,
    };

    editor.update_text(&host.items, "https://acme.test");
    let outcome = editor
        .handle_dismiss(&host.items, &DismissEvent::FocusLost)
        .unwrap();
    assert_eq!(outcome, Some(SubmitOutcome::Persisted));
    assert_eq!(host.sync(), 1);
    assert_eq!(host.items[0].url, "https://acme.test");

    // a second dismissal has nothing pending
    let outcome = editor
        .handle_dismiss(&host.items, &DismissEvent::Escape)
        .unwrap();
    assert_eq!(outcome, None);
    assert_eq!(host.sync(), 0);
}

#[test]
fn custom_validator_and_formatter() {
    let (hooks, proposals) = EditorHooks::<String>::channel();
    let hooks = hooks
        .with_validator(|text| {
            if text.len() > 8 {
                Validation::invalid("too long")
            } else {
                Validation::valid()
            }
        })
        .with_formatter(|text| text.to_uppercase());
    let mut editor = MultiItemController::new(hooks);
    let mut host = Host {
        items: Vec::new(),
        proposals,
    };

    editor.update_text(&host.items, "much too long");
    assert_eq!(editor.submit(&host.items).unwrap(), SubmitOutcome::Invalid);
    editor.update_text(&host.items, "vip");
    editor.submit(&host.items).unwrap();
    host.sync();
    assert_eq!(host.items, vec!["VIP"]);
}
