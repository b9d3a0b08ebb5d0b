//! 会话模块
//!
//! 把 `zonegate::SessionStore` 桥接成 Leptos 信号：存储本身不是 `Send`，
//! 用 `StoredValue::new_local` 托管，状态变化通过订阅写进信号。

use leptos::prelude::*;
use zonegate::{SessionState, SessionStore};

/// 会话上下文
///
/// 只包含 Copy 句柄，可以放心在闭包间传递。
#[derive(Clone, Copy)]
pub struct SessionContext {
    store: StoredValue<SessionStore, LocalStorage>,
    /// 会话状态快照（只读）
    pub state: ReadSignal<SessionState>,
}

impl SessionContext {
    /// 创建上下文并订阅存储的状态变化
    pub fn new(store: SessionStore) -> Self {
        let (state, set_state) = signal(store.snapshot());

        let subscription = store.subscribe(move |next| set_state.set(next.clone()));
        let handle = StoredValue::new_local(store);

        on_cleanup(move || {
            let _ = handle.try_with_value(|store| store.unsubscribe(subscription));
        });

        Self {
            store: handle,
            state,
        }
    }

    /// 取出存储句柄（内部是 Rc，克隆很便宜）
    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}
