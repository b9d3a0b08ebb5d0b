//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现 `zonegate::HttpClient`。

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};
use zonegate::{GateError, GateResult, HttpClient, HttpRequest, HttpResponse};

/// 基于浏览器 fetch 的 HTTP 客户端
///
/// 没有超时：挂起的请求会让守卫一直停在加载状态。
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build(req: &HttpRequest) -> GateResult<Request> {
        let headers = Headers::new().map_err(|e| {
            GateError::transport(format!("创建 Headers 失败: {:?}", e)).in_op("fetch.headers")
        })?;

        for (key, value) in &req.headers {
            headers.set(key, value).map_err(|e| {
                GateError::transport(format!("设置 Header 失败: {:?}", e))
                    .in_op_with("fetch.headers", key.clone())
            })?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| {
            GateError::transport(format!("{:?}", e)).in_op_with("fetch.request", req.url.clone())
        })
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> GateResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window = web_sys::window()
            .ok_or_else(|| GateError::transport("无法获取 window 对象").in_op("fetch.window"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                GateError::transport(format!("网络错误: {:?}", e))
                    .in_op_with("fetch.send", req.url.clone())
            })?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            GateError::transport(format!("Response 类型转换失败: {:?}", e)).in_op("fetch.cast")
        })?;

        let status = response.status();
        let promise = response.text().map_err(|e| {
            GateError::transport(format!("读取响应体失败: {:?}", e)).in_op("fetch.text")
        })?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| {
                GateError::transport(format!("读取响应体失败: {:?}", e)).in_op("fetch.text")
            })?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
