use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
}

pub fn from_input(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(x) => x,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);

	let Some((summary, description)) = split_doc_comment(&function.attrs) else {
		return syn::Error::new(
			function.sig.ident.span(),
			"documented routes need a doc comment, the first line being the summary",
		)
		.into_compile_error()
		.into();
	};

	let fn_name = format_ident!("{}_docs", function.sig.ident);
	let fn_vis = &function.vis;
	let tags = args.tag.iter();

	let description = description.map(|description| quote!(.description(#description)));

	quote! {
		#function

		#fn_vis fn #fn_name(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary)
				#description
				#(
					.tag(#tags)
				)*
		}
	}
	.into()
}

/// Splits the doc comment into its first line and the remaining text, if any.
fn split_doc_comment(attrs: &[syn::Attribute]) -> Option<(String, Option<String>)> {
	let lines = attrs
		.iter()
		.filter(|attr| attr.path().is_ident("doc"))
		.filter_map(|attr| match &attr.meta {
			syn::Meta::NameValue(syn::MetaNameValue {
				value:
					syn::Expr::Lit(syn::ExprLit {
						lit: syn::Lit::Str(literal),
						..
					}),
				..
			}) => Some(literal.value().trim().to_owned()),
			_ => None,
		})
		.collect::<Vec<_>>();

	let mut lines = lines.iter().skip_while(|line| line.is_empty());
	let summary = lines.next()?.clone();
	let description = lines
		.skip_while(|line| line.is_empty())
		.cloned()
		.collect::<Vec<_>>()
		.join(" ");

	Some((
		summary,
		(!description.is_empty()).then_some(description),
	))
}
