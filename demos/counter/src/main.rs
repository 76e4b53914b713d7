use std::cell::RefCell;
use std::rc::Rc;

use minuet_core::*;
use serde_json::{Map, Value, json};

struct ConsoleHost {
    data: RefCell<Map<String, Value>>,
}

impl Host for ConsoleHost {
    fn update(&self, data: Map<String, Value>) {
        self.data.borrow_mut().extend(data);
        println!("data: {}", Value::Object(self.data.borrow().clone()));
    }
}

fn counter_page() -> PageDefinition {
    PageDefinition::new()
        .on_ready(|_| println!("page ready"))
        .setup(|_query, _meta| {
            let count = signal(0i64);
            let double = Computed::new({
                let count = count.clone();
                move || count.get() * 2
            });

            let mut bindings = Bindings::new();
            bindings.set("count", &count);
            bindings.set("double", &double);
            bindings.set(
                "increment",
                Binding::action({
                    let count = count.clone();
                    move || count.update(|c| *c += 1)
                }),
            );
            bindings.set(
                "decrement",
                Binding::action(move || count.update(|c| *c -= 1)),
            );
            Some(bindings)
        })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let host = Rc::new(ConsoleHost {
        data: RefCell::new(Map::new()),
    });
    let page = Page::mount(
        counter_page(),
        host,
        PageMeta::new("counter", "demos/counter", json!({})),
    );

    page.load(&json!({}))?;
    page.ready();

    for _ in 0..3 {
        page.call("increment", &Value::Null);
    }
    page.call("decrement", &Value::Null);
    next_tick();

    page.unload();
    Ok(())
}
